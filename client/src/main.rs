use std::io;
use std::process::ExitCode;

use client::{
    logging, Config, DuplicateGuard, HttpPhoneLookup, HttpRelay, SpinError, SpinSession,
    SubmissionClient, TokioClock,
};
use shared::constants::DUPLICATE_PHONE_ERROR;
use shared::identity::Identity;
use shared::stores;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{error, info};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    if let Err(e) = logging::setup() {
        eprintln!("Failed to set up logging: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Spin to win stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Using lookup endpoint {}", config.lookup_url);

    let http = config.http_client()?;
    let guard = DuplicateGuard::new(
        HttpPhoneLookup::from_config(http.clone(), &config),
        config.retry_policy(),
    );
    let mut submitter = SubmissionClient::new(
        HttpRelay::from_config(http, &config),
        config.retry_policy(),
    );
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Spin to Win Amazing Rewards");
    println!("Fill out your details, then spin the wheel.");

    let mut session = loop {
        let identity = read_identity(&mut input).await?;
        match SpinSession::begin(identity, &guard, TokioClock, config.spin_duration).await {
            Ok(session) => break session,
            Err(SpinError::DuplicatePhone) => {
                println!("{}", DUPLICATE_PHONE_ERROR);
                return Ok(());
            }
            Err(e) => notify(&e),
        }
    };

    prompt(&mut input, "Press enter to spin the wheel").await?;
    let mut rng = rand::thread_rng();
    if let Some(start) = session.spin(&mut rng) {
        println!("The wheel is spinning ({} degrees)...", start.total_rotation);
    }

    let outcome = session.wait_for_outcome().await?;
    let identity = &session.context().identity;
    println!();
    println!("{}", outcome.headline(Some(&identity.full_name)));
    if outcome.is_win() {
        println!("{}", outcome.prize);
    }
    if let Some(hint) = outcome.claim_hint(Some(&identity.email)) {
        println!("{}", hint);
    }

    loop {
        match session.submit(&mut submitter).await {
            Ok(_) => break,
            Err(e) => {
                notify(&e);
                let answer = prompt(&mut input, "Retry submission? [Y/n]").await?;
                if answer.trim().eq_ignore_ascii_case("n") {
                    break;
                }
            }
        }
    }

    session.end(&mut submitter);
    Ok(())
}

async fn read_identity(input: &mut Input) -> io::Result<Identity> {
    let full_name = prompt(input, "Full Name").await?;
    let contact = prompt(input, "Contact Number").await?;
    let email = prompt(input, "Email Address").await?;

    let cities: Vec<_> = stores::cities().collect();
    let city = prompt(input, &format!("City, optional ({})", cities.join(", "))).await?;
    let store = match stores::stores_for(&city) {
        Some(list) => Some(prompt(input, &format!("Store, optional ({})", list.join(", "))).await?),
        None => None,
    };

    Ok(Identity::new(&full_name, &contact, &email).with_location(Some(city), store))
}

async fn prompt(input: &mut Input, label: &str) -> io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}: ", label).as_bytes()).await?;
    stdout.flush().await?;

    match input.next_line().await? {
        Some(line) => Ok(line),
        None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")),
    }
}

fn notify(err: &SpinError) {
    if let Some(message) = err.user_message() {
        println!("{}", message);
    }
}
