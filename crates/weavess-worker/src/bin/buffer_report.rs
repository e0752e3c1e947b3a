//! buffer-report - build position buffers for synthetic stations off-thread
//!
//! Generates dummy stations, sends one `createPositionBuffer` request per
//! station and one `createRecordSectionPositionBuffer` request through a
//! worker pool, then logs vertex counts and timings.
//!
//! ## Command line flags
//!
//! - `--stations N`: number of stations (default 8)
//! - `--seconds S`: window length in seconds (default 600)
//! - `--rate HZ`: sample rate (default 40)
//! - `--seed N`: random seed (default 7)
//! - `--config DIR`: directory holding `render.yaml` and `worker.yaml`

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use weavess_core::buffer::RecordSectionTrace;
use weavess_core::config::{default_config_dir, load_config, RenderConfig};
use weavess_core::segment::{create_dummy_waveform, DummyWaveformParams};
use weavess_core::util::calculate_min_max_offsets;
use weavess_core::{DistanceUnits, SegmentData, Station, TimeRange};
use weavess_worker::protocol::{PositionBufferRequest, RpcPayload, WorkerOperation};
use weavess_worker::{default_registry, WorkerConfig, WorkerPool};

/// Start of the synthetic window (2018-06-01T15:53:46Z)
const START_TIME_SECS: f64 = 1_527_868_426.0;

struct Args {
    stations: usize,
    seconds: f64,
    rate: f64,
    seed: u64,
    config_dir: PathBuf,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args {
            stations: 8,
            seconds: 600.0,
            rate: 40.0,
            seed: 7,
            config_dir: default_config_dir(),
        };

        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let mut value = || iter.next().with_context(|| format!("{} needs a value", flag));
            match flag.as_str() {
                "--stations" => args.stations = value()?.parse().context("--stations")?,
                "--seconds" => args.seconds = value()?.parse().context("--seconds")?,
                "--rate" => args.rate = value()?.parse().context("--rate")?,
                "--seed" => args.seed = value()?.parse().context("--seed")?,
                "--config" => args.config_dir = PathBuf::from(value()?),
                other => bail!("Unknown flag: {}", other),
            }
        }
        Ok(args)
    }
}

fn generate_stations(args: &Args, rng: &mut StdRng) -> Result<Vec<Station>> {
    let params = DummyWaveformParams {
        start_time_secs: START_TIME_SECS,
        end_time_secs: START_TIME_SECS + args.seconds,
        sample_rate: args.rate,
        event_amplitude: 8.0,
        noise_amplitude: 1.0,
    };

    (0..args.stations)
        .map(|i| {
            let mut station = create_dummy_waveform(&format!("ST{:02}.BHZ", i), &params, rng)
                .with_context(|| format!("Failed to generate station {}", i))?;
            station.default_channel.time_offset_seconds = Some(rng.gen_range(-30.0..30.0));
            Ok(station.with_distance(rng.gen_range(1.0..90.0), DistanceUnits::Degrees))
        })
        .collect()
}

async fn run(args: Args) -> Result<()> {
    let render: RenderConfig = load_config(&args.config_dir.join("render.yaml"));
    let worker: WorkerConfig = load_config(&args.config_dir.join("worker.yaml"));
    let timeout = worker.request_timeout().unwrap_or(Duration::from_secs(60));

    let mut rng = StdRng::seed_from_u64(args.seed);
    let stations = generate_stations(&args, &mut rng)?;

    // Widen the display so every shifted channel stays on screen
    let offsets = calculate_min_max_offsets(&stations);
    let display = TimeRange::new(
        START_TIME_SECS + offsets.min_offset,
        START_TIME_SECS + args.seconds + offsets.max_offset,
    );
    log::info!(
        "{} stations, offsets {:.2}..{:.2} s, display {:.1} s",
        stations.len(),
        offsets.min_offset,
        offsets.max_offset,
        display.duration_secs()
    );

    let mut pool = WorkerPool::new(&worker, default_registry())?;
    let started = Instant::now();

    let pending: Vec<_> = stations
        .iter()
        .filter_map(|station| {
            let channel = &station.default_channel;
            let waveform = channel.waveform.as_ref()?;
            let request = PositionBufferRequest {
                data: SegmentData::BySampleRate(waveform.to_data()),
                params: render.position_buffer_params(display, channel.time_offset()),
            };
            Some((
                station.id.clone(),
                pool.submit(WorkerOperation::CreatePositionBuffer, RpcPayload::PositionBuffer(request)),
            ))
        })
        .collect();

    let traces = stations.iter().filter_map(RecordSectionTrace::from_station).collect();
    let record_section = pool.submit(
        WorkerOperation::CreateRecordSectionPositionBuffer,
        RpcPayload::RecordSection(render.record_section_params(display, traces)),
    );

    let mut total_vertices = 0;
    for (station_id, request) in pending {
        let buffer = request
            .with_timeout(timeout)
            .await?
            .into_position_buffer()
            .context("createPositionBuffer returned the wrong result kind")?;
        log::info!("{}: {} vertices, {} bytes", station_id, buffer.vertex_count(), buffer.as_bytes().len());
        total_vertices += buffer.vertex_count();
    }

    let section = record_section
        .with_timeout(timeout)
        .await?
        .into_record_section()
        .context("createRecordSectionPositionBuffer returned the wrong result kind")?;
    for entry in &section {
        log::debug!("record section {}: baseline {:.2}", entry.station_id, entry.baseline);
    }

    log::info!(
        "Built {} vertices across {} buffers plus a {}-station record section in {:?}",
        total_vertices,
        stations.len(),
        section.len(),
        started.elapsed()
    );

    pool.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    // Set RUST_LOG=debug for per-request timings
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(args))
}
