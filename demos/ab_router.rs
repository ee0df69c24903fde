//! A/B Router Demo
//!
//! Run with: `cargo run --example ab_router`
//!
//! Walks one subject through assignment, routing, replay, and an explicit
//! cache clear, for a two-arm experiment plus a mobile-gated arm.

use reparto::experiment::{DeviceClass, Experiment, Subject, Variant};
use reparto::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reparto=debug")),
        )
        .init();

    println!("=== Reparto A/B Router Demo ===\n");

    let client = Client::builder()
        .experiment(
            Experiment::builder("wave2")
                .variant(Variant::new("control", 0.5))
                .variant(Variant::new("b", 0.5))
                .build()?,
        )
        .experiment(
            Experiment::builder("hero")
                .variant(Variant::new("control", 0.8))
                .variant(Variant::new("mobile-hero", 0.2).gated(DeviceClass::Mobile))
                .build()?,
        )
        .build();

    let subject = Subject::new("visitor-42");

    // First visit: draw and persist
    let assignment = client.assign("wave2", &subject).await?;
    println!(
        "1. Assigned {} -> {} ({:?})",
        subject.id(),
        assignment.variant(),
        assignment.source()
    );

    // Routing decision for the landing page
    let decision = client.route("wave2", &subject, "/index.html").await?;
    println!("2. Route /index.html -> {decision:?}");

    // Second visit: sticky replay
    let replay = client.assign("wave2", &subject).await?;
    println!(
        "3. Replayed {} -> {} ({:?})",
        subject.id(),
        replay.variant(),
        replay.source()
    );

    // Gated experiment on desktop: mobile-hero can never win
    let hero = client.assign("hero", &subject).await?;
    println!("4. Gated experiment on desktop -> {}", hero.variant());

    // Explicit cache clear, then a fresh draw
    client.clear_assignment("wave2", &subject).await?;
    let redraw = client.assign("wave2", &subject).await?;
    println!(
        "5. After clear -> {} ({:?})",
        redraw.variant(),
        redraw.source()
    );

    Ok(())
}
