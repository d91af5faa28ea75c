use tracing_subscriber::EnvFilter;

use tideline::world::{
    DistanceTable, RecordingMarket, StaticHeadquarters, StaticShipping, TimeWindow,
};
use tideline::{
    ActionData, CargoType, Collaborators, Company, CompanyId, Event, KernelConfig, KernelResult,
    Location, PortId, SimTime, Simulation, Trade, TradeId, Vessel, VesselId, World,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("═══════════════════════════════════════════════════════");
    println!("  Tideline — Maritime Discrete-Event Kernel");
    println!("  Two vessels, one announcement cycle, one late pickup");
    println!("═══════════════════════════════════════════════════════");
    println!();

    if let Err(err) = run_demo() {
        eprintln!("  ✗ demo aborted: {}", err);
        std::process::exit(1);
    }
    println!();
    println!("  ✓ Demo complete.");
}

fn run_demo() -> KernelResult<()> {
    let aurora = VesselId::new(1);
    let borealis = VesselId::new(2);

    let network = DistanceTable::new()
        .with_route("Rotterdam", "Lagos", 4200.0)
        .with_route("Lagos", "Santos", 3300.0)
        .with_route("Rotterdam", "Santos", 5400.0);
    let world = World::new(Box::new(network))
        .with_vessel(Vessel::new(aurora, "Aurora", Location::port("Rotterdam")))
        .with_vessel(Vessel::new(borealis, "Borealis", Location::port("Lagos")));

    let config = KernelConfig::with_interval(168.0).with_horizon(SimTime::new(336.0));
    let mut sim = Simulation::new(world, config)?;
    sim.enable_execution_log();

    let grain = Trade::new(
        TradeId::new(1),
        PortId::new("Rotterdam"),
        PortId::new("Lagos"),
        CargoType::new("Grain"),
        12_000.0,
    )
    .available_at(SimTime::new(168.0))
    .with_window(TimeWindow::new((170.0, 190.0), (330.0, 420.0)));
    let ore = Trade::new(
        TradeId::new(2),
        PortId::new("Lagos"),
        PortId::new("Santos"),
        CargoType::new("Ore"),
        30_000.0,
    )
    .available_at(SimTime::new(168.0))
    .with_window(TimeWindow::new((170.0, 180.0), (300.0, 400.0)));

    let mut shipping = StaticShipping::from_trades(vec![grain.clone(), ore.clone()]);
    let mut market = RecordingMarket::new();
    let hq = StaticHeadquarters::new()
        .with_company(Company::new(CompanyId::new(1), "Northwind Lines"), &[aurora])
        .with_company(Company::new(CompanyId::new(2), "Equator Bulk"), &[borealis]);

    sim.schedule(Event::first_cargo_announcement(SimTime::ZERO, SimTime::new(168.0)))?;

    // Aurora picks up on time; Borealis idles and misses its window.
    sim.schedule(Event::arrival(SimTime::new(175.0), aurora, grain.clone(), true))?;
    sim.schedule(Event::cargo_transfer(SimTime::new(180.0), aurora, grain.clone(), true))?;
    sim.schedule(Event::idle(SimTime::new(150.0), borealis, Location::port("Lagos")))?;
    sim.schedule(Event::arrival(SimTime::new(200.0), borealis, ore, true))?;

    let mut collaborators = Collaborators {
        shipping: &mut shipping,
        market: &mut market,
        headquarters: &hq,
    };
    let mut processed = sim.run_until(SimTime::new(180.0), &mut collaborators)?;

    // Grain is on board; only now is Aurora's laden voyage planned.
    sim.schedule(Event::travel(
        SimTime::new(355.0),
        aurora,
        PortId::new("Rotterdam"),
        PortId::new("Lagos"),
    ))?;
    sim.schedule(Event::arrival(SimTime::new(356.0), aurora, grain.clone(), false))?;
    sim.schedule(Event::cargo_transfer(SimTime::new(360.0), aurora, grain, false))?;
    processed += sim.run_until(SimTime::new(500.0), &mut collaborators)?;

    println!("  Processed {} events, now at {}", processed, sim.current_time());
    println!();
    if let Some(log) = sim.execution_log() {
        for record in log.records() {
            let who = record
                .vessel
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {:<24} {:<18} {:<4} {}",
                record.time.to_string(),
                record.kind,
                who,
                record.info.as_deref().unwrap_or("")
            );
            if let ActionData::Auction(distribution) = &record.action_data {
                println!("      allocated {} trade(s)", distribution.allocated_count());
            }
        }
        println!();
        for (vessel, violation) in log.violations() {
            println!("  ! {} violated its window: {}", vessel, violation);
        }
    }
    Ok(())
}
