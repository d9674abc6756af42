use color_eyre::eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use veloo_application::FlowSignal;
use veloo_service::{
    OnboardingService, init_tracing,
    terminal::{Command, HELP, parse_command, render},
};

/// Terminal host for the seller onboarding flow
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let service = OnboardingService::configure()?;
    let mut handle = service.start().await;
    let mut snapshots = handle.snapshots();
    println!("{}", render(&snapshots.borrow_and_update()));
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(Command::Click)) => handle.click(),
                    Ok(Some(Command::Event(event))) => handle.send(event)?,
                    Err(e) => println!("{e}"),
                }
            }
            Ok(()) = snapshots.changed() => {
                println!("{}", render(&snapshots.borrow_and_update()));
            }
            Some(signal) = handle.next_signal() => match signal {
                FlowSignal::VerificationComplete => {
                    println!("Email verified. Continue to {}", service.dashboard_url());
                    break;
                }
                FlowSignal::BackToSignup => println!("Back to signup. Your details are kept."),
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}
