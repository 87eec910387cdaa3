use std::fs;
use threat_vector_map::api::SceneBuilder;
use threat_vector_map::utils::ConfigurationManager;
use threat_vector_map::{parse_snapshot, ManualFrameTimer, ThreatMapAnimator};
use tracing_subscriber::EnvFilter;

const DEFAULT_FRAMES: u64 = 60;

fn usage(program: &str) {
    eprintln!("Usage: {} <snapshot.json> [frames] [--config <config.json>]", program);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("threat-vector-map", |s| s.as_str());

    let mut snapshot_path = None;
    let mut frames = DEFAULT_FRAMES;
    let mut config_path = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => match rest.next() {
                Some(path) => config_path = Some(path.clone()),
                None => {
                    usage(program);
                    return Err("--config requires a path".into());
                }
            },
            "-h" | "--help" => {
                usage(program);
                return Ok(());
            }
            value if snapshot_path.is_none() => snapshot_path = Some(value.to_string()),
            value => {
                frames = value
                    .parse()
                    .map_err(|_| format!("invalid frame count '{}'", value))?;
            }
        }
    }

    let Some(snapshot_path) = snapshot_path else {
        usage(program);
        return Err("missing snapshot file".into());
    };

    let manager = match &config_path {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    let config = manager.get_config().clone();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let snapshot = fs::read_to_string(&snapshot_path)
        .map_err(|e| format!("failed to read snapshot '{}': {}", snapshot_path, e))?;
    let events = parse_snapshot(&snapshot)?;

    let timer = ManualFrameTimer::shared();
    let mut animator = ThreatMapAnimator::new(config, timer.clone())?;
    let report = animator.sync(&events)?;
    tracing::info!(
        events = events.len(),
        visible = animator.active_count(),
        skipped = report.skipped,
        excluded = report.excluded,
        "snapshot loaded"
    );

    for _ in 0..frames {
        let fired = timer.advance_frame();
        animator.dispatch_frame(&fired);
    }

    let builder = SceneBuilder::pretty();
    println!("{}", builder.to_json(&builder.build(&animator))?);

    tracing::info!(
        frames,
        positions = animator.stats().positions_emitted,
        "animation run complete"
    );
    animator.shutdown();
    Ok(())
}
