use clap::Parser;
use listing_stats::{Analyzer, Command, input};
use tokio::sync::mpsc;

mod args;
use args::{Args, convert_source_type};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting analyzer for: {}", args.uri);

    let source = convert_source_type(args.type_, &args.uri);

    let watched = source.is_watched();
    if watched {
        println!("Note: Web analysis requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
        println!("Commands: <number> sets the calculator area, 'r' resets, 'q' quits.");
    };

    let mut analyzer = Analyzer::new(source);
    if let Some(path) = &args.config {
        analyzer = match analyzer.with_config_file(path) {
            Ok(analyzer) => analyzer,
            Err(e) => {
                ::log::error!("Failed to load configuration {}: {}", path.display(), e);
                std::process::exit(2);
            }
        };
    }
    if let Some(bins) = args.bins {
        analyzer = analyzer.with_bins(bins);
    }
    if let Some(area) = args.area {
        analyzer = analyzer.with_area_quantity(area);
    }
    if let Some(millis) = args.poll_interval_ms {
        analyzer = analyzer.with_poll_interval_ms(millis);
    }
    if let Some(millis) = args.settle_delay_ms {
        analyzer = analyzer.with_settle_delay_ms(millis);
    }
    if let Some(dir) = &args.state_dir {
        analyzer = analyzer.with_state_dir(dir);
    }

    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    if watched {
        let stdin = std::io::BufReader::new(std::io::stdin());
        input::spawn_command_reader(stdin, command_tx.clone());
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = command_tx.send(Command::Stop).await;
            }
        });
    } else {
        drop(command_tx);
    }

    if let Err(e) = analyzer.run(command_rx).await {
        ::log::error!("Analyzer failed: {}", e);
        std::process::exit(1);
    }
}
