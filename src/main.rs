use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use orbit_glance::config::Config;
use orbit_glance::ephemeris::sub_solar_point;
use orbit_glance::geo::to_cartesian;
use orbit_glance::scene::SceneState;
use orbit_glance::telemetry::{
    Clock, HttpTelemetrySource, IntervalScheduler, SystemClock, TelemetryPoller,
};
use orbit_glance::web;

#[derive(Parser)]
#[command(name = "orbit-glance")]
#[command(about = "Live satellite and sub-solar point tracking in scene coordinates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sub-solar point and sun direction
    Sun {
        /// RFC3339 instant, defaults to now
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        config: Option<String>,
    },
    /// Poll telemetry and log the scene state until interrupted
    Watch {
        #[arg(long)]
        config: Option<String>,
    },
    /// Poll telemetry and serve the JSON API
    Serve {
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sun { at, config } => sun(at.as_deref(), config.as_deref()),
        Commands::Watch { config } => with_runtime(config.as_deref(), watch),
        Commands::Serve { config } => with_runtime(config.as_deref(), serve),
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match Config::load(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn sun(at: Option<&str>, config_path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let at = match at {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                eprintln!("Invalid --at: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Utc::now(),
    };

    let point = sub_solar_point(at);
    let direction = to_cartesian(
        &point,
        config.scene.body_radius * config.scene.sun_distance_factor,
    );
    println!("Sub-solar point at {}", at.to_rfc3339());
    println!("  latitude:  {:>9.4}°", point.latitude_deg());
    println!("  longitude: {:>9.4}°", point.longitude_deg());
    println!(
        "  direction: ({:.4}, {:.4}, {:.4})",
        direction.x, direction.y, direction.z
    );
    ExitCode::SUCCESS
}

fn with_runtime<F, Fut>(config_path: Option<&str>, f: F) -> ExitCode
where
    F: FnOnce(Config) -> Fut,
    Fut: std::future::Future<Output = ExitCode>,
{
    let Some(config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(f(config))
}

async fn watch(config: Config) -> ExitCode {
    let poller_config = config.telemetry.poller_config();
    let source = match HttpTelemetrySource::new(&config.telemetry.url, poller_config.fetch_timeout)
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error creating telemetry source: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let clock = Arc::new(SystemClock);
    let mut poller = TelemetryPoller::new(
        Arc::new(source),
        Arc::new(IntervalScheduler),
        clock.clone(),
        poller_config,
    );
    if let Err(e) = poller.start() {
        eprintln!("Error starting poller: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Watching {} every {:?}", config.telemetry.url, poller_config.interval);
    let mut ticker = tokio::time::interval(poller_config.interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let scene = SceneState::compute(&poller.track_state(), clock.now(), &config.scene);
        match scene.object_vector {
            Some(v) => log::info!(
                "[{}] object ({:.3}, {:.3}, {:.3}) sun ({:.2}, {:.2}, {:.2})",
                scene.health,
                v.x,
                v.y,
                v.z,
                scene.sun_direction.x,
                scene.sun_direction.y,
                scene.sun_direction.z
            ),
            None => log::info!(
                "[{}] no object, sun ({:.2}, {:.2}, {:.2})",
                scene.health,
                scene.sun_direction.x,
                scene.sun_direction.y,
                scene.sun_direction.z
            ),
        }
    }

    poller.stop().await;
    ExitCode::SUCCESS
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
