//! `shmtap` binary: subscribe to a shared-memory feed and print each
//! decoded message as one JSON line.
//!
//! SIGINT or SIGTERM cancels the poll loop cooperatively; a watchdog
//! force-exits non-zero if the loop has not stopped within the grace
//! period.

mod cli;

use std::{io, num::NonZeroUsize, process::ExitCode, thread, time::Duration};

use clap::Parser;
use log::{error, info};
use shmtap::{
    Conductor,
    DecodeFaultPolicy,
    Dispatcher,
    FragmentAssembler,
    PollOutcome,
    Poller,
    PollerConfig,
    feed::{self, Expiration, JsonLineSink, Quote, Trade},
    idle::{Backoff, BusySpin, IdleStrategy},
    transport::{
        ConnectOptions,
        loopback::{LoopbackPublisher, LoopbackTransport},
    },
};
use tokio_util::sync::CancellationToken;

fn main() -> ExitCode {
    // Install structured logging for the binary; the library only emits
    // through the `log` facade.
    tracing_subscriber::fmt::init();
    let cli = cli::Cli::parse();

    match run(&cli) {
        Ok(PollOutcome::Cancelled) => ExitCode::SUCCESS,
        Err(error) => {
            error!("fatal: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<PollOutcome, Box<dyn std::error::Error>> {
    let options = ConnectOptions {
        dir: cli.dir.clone(),
        channel: cli.channel.clone(),
        stream_id: cli.stream_id,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    let mut conductor = Conductor::<LoopbackTransport>::connect(&options)?;
    let cancel = CancellationToken::new();
    spawn_signal_watchdog(cancel.clone(), Duration::from_secs(cli.grace_secs))?;

    if cli.demo_rate > 0 {
        let publisher = conductor
            .transport_mut()
            .publisher(&cli.channel, cli.stream_id);
        spawn_demo_publisher(publisher, cli.demo_rate, cancel.clone());
    }

    let mut subscription = conductor.subscribe()?;
    let mut dispatcher = Dispatcher::new(feed::registry()?, JsonLineSink::stdout());
    let mut assembler = FragmentAssembler::default();
    let mut idler: Box<dyn IdleStrategy> = match cli.idle {
        cli::IdleMode::Busy => Box::new(BusySpin),
        cli::IdleMode::Backoff => Box::new(Backoff::default()),
    };
    let config = PollerConfig {
        decode_fault_policy: if cli.skip_malformed {
            DecodeFaultPolicy::Skip
        } else {
            DecodeFaultPolicy::Fatal
        },
        ..PollerConfig::default()
    };

    let outcome = Poller::new(config).run(
        &mut subscription,
        &mut assembler,
        &mut dispatcher,
        idler.as_mut(),
        &cancel,
    )?;
    conductor.close()?;
    Ok(outcome)
}

/// Cancel the token on SIGINT/SIGTERM, then force-exit if the loop is
/// still running once the grace period lapses.
fn spawn_signal_watchdog(cancel: CancellationToken, grace: Duration) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    thread::Builder::new()
        .name("signals".to_owned())
        .spawn(move || {
            if !runtime.block_on(wait_for_signal()) {
                return;
            }
            info!("received signal, stopping...");
            cancel.cancel();
            thread::sleep(grace);
            error!("poll loop did not stop within {grace:?}");
            std::process::exit(1);
        })?;
    Ok(())
}

async fn wait_for_signal() -> bool {
    use tokio::signal::unix::{SignalKind, signal};

    match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(mut interrupt), Ok(mut terminate)) => {
            tokio::select! {
                _ = interrupt.recv() => {}
                _ = terminate.recv() => {}
            }
            true
        }
        (Err(err), _) | (_, Err(err)) => {
            error!("signal handler installation failed: {err}");
            false
        }
    }
}

/// Fragment size for demo messages, small enough that quotes and trades
/// exercise the multi-fragment reassembly path.
const DEMO_FRAGMENT_LEN: NonZeroUsize = NonZeroUsize::new(16).unwrap();

fn spawn_demo_publisher(publisher: LoopbackPublisher, rate: u32, cancel: CancellationToken) {
    let pause = Duration::from_secs(1) / rate;
    thread::spawn(move || {
        let mut sequence: u64 = 0;
        while !cancel.is_cancelled() {
            let payload = if sequence % 2 == 0 {
                demo_quote(sequence).encode()
            } else {
                demo_trade(sequence).encode()
            };
            publisher.publish(&payload, DEMO_FRAGMENT_LEN);
            sequence += 1;
            thread::sleep(pause);
        }
    });
}

fn demo_quote(sequence: u64) -> Quote {
    let tick = u32::try_from(sequence % 100).unwrap_or(0);
    Quote {
        symbol: "DEMO".to_owned(),
        expiration: Expiration {
            code: 'T',
            year: 26,
            day: 18,
        },
        timestamp: sequence,
        strike_price: 450_000,
        bid_price: 1_200 + tick,
        ask_price: 1_260 + tick,
        bid_size: 40,
        ask_size: 25,
        bid_exchange: 3,
        ask_exchange: 7,
        condition: b'R',
    }
}

fn demo_trade(sequence: u64) -> Trade {
    let tick = u32::try_from(sequence % 100).unwrap_or(0);
    Trade {
        symbol: "DEMO".to_owned(),
        expiration: Expiration {
            code: 'T',
            year: 26,
            day: 18,
        },
        timestamp: sequence,
        strike_price: 450_000,
        premium_price: 1_230 + tick,
        volume: 1 + tick % 9,
        exchange: 5,
        condition: b'S',
    }
}
