use std::env::var;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};

use clap::Parser;
use feed_state::cmds::parser::{parse_store_target, StoreTarget};
use feed_state::cmds::App;
use feed_state::conductors::Conductor;
use feed_state::directory::UserDirectory;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const DEFAULT_STORE: &str = "file:feed.json";

async fn async_main(app: App) -> ExitCode {
    let AppValues { store } = match get_values(app.store) {
        Ok(o) => o,
        Err(()) => return ExitCode::FAILURE,
    };

    let feed = match feed_state::from_target(&store).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cannot open store: {:#}", e);
            return ExitCode::FAILURE;
        },
    };

    let acting = app.acting.unwrap_or(UserDirectory::DEFAULT_USER);
    let mut conductor = match Conductor::acting_as(feed, acting) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot act as given user: {}", e);
            return ExitCode::FAILURE;
        },
    };

    match app.cmd {
        Some(cmd) => match conductor.conduct(cmd).await {
            Ok(resps) => {
                resps.iter().for_each(|r| println!("{}\n", r));
                ExitCode::SUCCESS
            },
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            },
        },
        None => match shell(conductor).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("shell stopped: {}", e);
                ExitCode::FAILURE
            },
        },
    }
}

async fn shell(mut conductor: Conductor) -> ::std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(format!("[{}]> ", conductor.session.current_user).as_bytes())
            .await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(l) => l,
            None => break,
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        for r in conductor.conduct_line(&line).await {
            stdout.write_all(format!("{}\n\n", r).as_bytes()).await?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let app = App::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(::std::io::stderr)
        .compact()
        .init();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name_fn(|| {
            static NUM: AtomicU32 = AtomicU32::new(0);
            format!("feed_state-worker-{}", NUM.fetch_add(1, Ordering::SeqCst))
        })
        .build()
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    rt.block_on(async_main(app))
}

struct AppValues {
    store: StoreTarget,
}

fn get_values(store: Option<StoreTarget>) -> Result<AppValues, ()> {
    let store = match store {
        Some(s) => s,
        None => {
            let raw = crate::try_get_value!("FEED_STORE", "BUILD_WITH_FEED_STORE", DEFAULT_STORE);
            parse_store_target(&raw).map_err(|e| eprintln!("bad store target `{}`: {}", raw, e))?
        },
    };

    Ok(AppValues { store })
}

#[macro_export]
macro_rules! try_get_value {
    ($n:literal, $bn:literal, $default:expr) => {{
        match var($n) {
            Ok(t) => t,
            Err(_) => match option_env!($bn) {
                Some(t) => t.to_string(),
                None => {
                    tracing::debug!("`{}` not set, using `{}`", $n, $default);
                    $default.to_string()
                },
            },
        }
    }};
}
