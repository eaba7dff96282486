use clap::{Args, Parser, Subcommand};
use engine::{
    AuthLookup, DemoUsers, EngineError, Language, Money, TransactionKind, User, UserStore, ledger,
};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "tabung")]
#[command(about = "Demo banking ledger over a JSON user store")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the store file path.
    #[arg(long)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Signup(SignupArgs),
    /// Sign in with a registered or demo account.
    Login(LoginArgs),
    /// Sign the current user out.
    Logout,
    /// Show who is signed in.
    Status,
    /// Mark the onboarding screens as seen.
    Onboarded,
    /// Show the current balance.
    Balance,
    /// Add money to the account.
    Deposit(AmountArgs),
    /// Take money out of the account.
    Withdraw(AmountArgs),
    /// Send money to another account.
    Transfer(TransferArgs),
    /// Print the account statement, newest first.
    Statement,
    /// Show or update profile fields.
    Profile(ProfileArgs),
    /// Show or update app preferences.
    Prefs(PrefsArgs),
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "TABUNG_PASSWORD")]
    password: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    /// Opening balance in ringgit.
    #[arg(long, default_value = "0")]
    initial_balance: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "TABUNG_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct AmountArgs {
    /// Amount in ringgit, up to two decimals.
    amount: String,
}

#[derive(Args, Debug)]
struct TransferArgs {
    /// Recipient account number.
    #[arg(long)]
    to: String,
    /// Amount in ringgit, up to two decimals.
    amount: String,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug)]
struct PrefsArgs {
    /// Interface language ("en" or "ms").
    #[arg(long)]
    language: Option<String>,
    /// Biometric unlock ("on" or "off").
    #[arg(long)]
    biometric: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let settings = match settings::Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tabung={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let path = cli.store.unwrap_or(settings.storage.path);
    tracing::debug!("using store at {path}");
    let store = UserStore::new(path);

    if let Err(err) = run(cli.command, &store) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command, store: &UserStore) -> Result<(), EngineError> {
    match command {
        Command::Signup(args) => {
            let user = User::sign_up(
                &args.email,
                &args.password,
                &args.name,
                &args.phone,
                &args.initial_balance,
            )?;
            store.register(&user)?;
            println!(
                "created account {} for {}",
                user.account_number(),
                user.full_name()
            );
        }
        Command::Login(args) => {
            let user = match store.authenticate(&args.username, &args.password) {
                Ok(user) => {
                    store.set_session(&user)?;
                    user
                }
                Err(EngineError::InvalidCredentials) => {
                    tracing::debug!("no registered account matched, trying the demo accounts");
                    let user = DemoUsers::new().authenticate(&args.username, &args.password)?;
                    store.commit_and_activate(&user)?;
                    user
                }
                Err(err) => return Err(err),
            };
            println!("signed in as {}", user.full_name());
        }
        Command::Logout => {
            store.clear_session()?;
            println!("signed out");
        }
        Command::Status => {
            if !store.onboarding_complete()? {
                println!("onboarding has not been completed");
            }
            match store.session()? {
                Some(user) => println!(
                    "{} ({}), account {}",
                    user.full_name(),
                    user.email(),
                    user.account_number()
                ),
                None => println!("nobody is signed in"),
            }
        }
        Command::Onboarded => {
            store.set_onboarding_complete(true)?;
            println!("onboarding marked as seen");
        }
        Command::Balance => {
            let user = current_user(store)?;
            println!(
                "{} in account {}",
                format_rm(user.balance()),
                user.account_number()
            );
        }
        Command::Deposit(args) => {
            let mut user = current_user(store)?;
            let posting = ledger::deposit(user.balance(), &args.amount, "Deposit")?;
            let amount = posting.record.amount();
            user.apply(posting);
            store.commit_and_activate(&user)?;
            println!(
                "deposited {}, balance is {}",
                format_rm(amount),
                format_rm(user.balance())
            );
        }
        Command::Withdraw(args) => {
            let mut user = current_user(store)?;
            let posting = ledger::withdraw(user.balance(), &args.amount, "Withdrawal")?;
            let amount = posting.record.amount();
            user.apply(posting);
            store.commit_and_activate(&user)?;
            println!(
                "withdrew {}, balance is {}",
                format_rm(amount),
                format_rm(user.balance())
            );
        }
        Command::Transfer(args) => {
            let mut user = current_user(store)?;
            let posting = ledger::transfer(
                user.balance(),
                &args.amount,
                &args.to,
                user.account_number(),
                "Transfer sent",
            )?;
            let amount = posting.record.amount();
            user.apply(posting);
            store.commit_and_activate(&user)?;
            println!(
                "sent {} to {}, balance is {}",
                format_rm(amount),
                args.to.trim(),
                format_rm(user.balance())
            );
        }
        Command::Statement => {
            let user = current_user(store)?;
            if user.transactions().is_empty() {
                println!("no transactions yet");
                return Ok(());
            }
            for record in user.transactions().iter().rev() {
                println!(
                    "{}  {}{}  {}  balance {}",
                    record.date(),
                    sign_for(record.kind()),
                    format_rm(record.amount()),
                    record.description(),
                    format_rm(record.balance_after()),
                );
            }
        }
        Command::Profile(args) => {
            let mut user = current_user(store)?;
            if args.name.is_none() && args.phone.is_none() {
                println!("name:  {}", user.full_name());
                println!("phone: {}", user.phone_number());
                return Ok(());
            }
            if let Some(name) = args.name {
                user.set_full_name(&name)?;
            }
            if let Some(phone) = args.phone {
                user.set_phone_number(&phone)?;
            }
            store.commit_and_activate(&user)?;
            println!("profile updated");
        }
        Command::Prefs(args) => {
            let mut user = current_user(store)?;
            if args.language.is_none() && args.biometric.is_none() {
                println!("language:  {}", user.language());
                println!(
                    "biometric: {}",
                    if user.biometric_enabled() { "on" } else { "off" }
                );
                return Ok(());
            }
            if let Some(language) = args.language {
                user.set_language(Language::try_from(language.as_str())?);
            }
            if let Some(biometric) = args.biometric {
                user.set_biometric_enabled(parse_toggle(&biometric)?);
            }
            store.commit_and_activate(&user)?;
            println!("preferences updated");
        }
    }

    Ok(())
}

fn current_user(store: &UserStore) -> Result<User, EngineError> {
    store
        .session()?
        .ok_or_else(|| EngineError::NotFound("current user".to_string()))
}

fn parse_toggle(raw: &str) -> Result<bool, EngineError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(EngineError::InvalidUser(format!(
            "expected \"on\" or \"off\", got {other}"
        ))),
    }
}

const fn sign_for(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "+",
        TransactionKind::Withdrawal | TransactionKind::TransferOut => "-",
    }
}

/// Formats an amount as `RM1,234.56`, with the minus ahead of the symbol.
fn format_rm(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let abs = amount.sen().unsigned_abs();
    let ringgit = abs / 100;
    let sen = abs % 100;

    let mut reversed = String::new();
    for (index, digit) in ringgit.to_string().chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            reversed.push(',');
        }
        reversed.push(digit);
    }
    let grouped: String = reversed.chars().rev().collect();

    format!("{sign}RM{grouped}.{sen:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_format_with_thousands_separators() {
        assert_eq!(format_rm(Money::new(0)), "RM0.00");
        assert_eq!(format_rm(Money::new(123_456)), "RM1,234.56");
        assert_eq!(format_rm(Money::new(100_000_000)), "RM1,000,000.00");
        assert_eq!(format_rm(Money::new(-50_00)), "-RM50.00");
    }

    #[test]
    fn toggles_accept_on_and_off_only() {
        assert!(parse_toggle(" ON ").unwrap());
        assert!(!parse_toggle("off").unwrap());
        assert!(parse_toggle("maybe").is_err());
    }
}
