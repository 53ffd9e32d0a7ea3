//! # Command Parsing
//!
//! Turns one input line into a [`Command`]. Pure: no I/O, no session access.
//!
//! ## Grammar
//! ```text
//! products                       list the catalog
//! show <product>                 description and price of one product
//! add <product> [qty]            qty defaults to 1, must be 1..=max
//! remove <product> [qty]
//! clear | cart | save | load
//! checkout | back
//! discount [code]                an empty code is accepted and ignored
//! pay | receipt | help | quit
//! ```
//!
//! Product names may contain spaces. A trailing integer is read as the
//! quantity: `add röda äpplen 3` adds 3 of `röda äpplen`.

use thiserror::Error;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Show(String),
    Add { product: String, quantity: i64 },
    Remove { product: String, quantity: i64 },
    Clear,
    Cart,
    Save,
    Load,
    Checkout,
    Back,
    Discount(String),
    Pay,
    Receipt,
    Help,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Okänt kommando: '{0}'. Skriv 'help' för hjälp.")]
    Unknown(String),

    #[error("'{command}' behöver {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Antal måste vara mellan 1 och {max}, fick {value}")]
    QuantityOutOfRange { value: i64, max: u32 },
}

/// Help text listing every command.
pub const HELP: &str = "\
Kommandon:
  products                 visa produktutbud
  show <produkt>           visa produktinformation
  add <produkt> [antal]    lägg till i varukorg
  remove <produkt> [antal] ta bort från varukorg
  clear                    rensa varukorg
  cart                     visa varukorg
  save                     spara varukorg
  load                     hämta sparad varukorg
  checkout                 gå till kassan
  back                     fortsätt handla
  discount <kod>           använd rabattkod
  pay                      betala
  receipt                  visa kvitto
  help                     visa den här hjälpen
  quit                     avsluta";

/// Parses one line. Blank lines give `Ok(None)`.
///
/// `max_quantity` is the largest amount the quantity selector allows.
pub fn parse(line: &str, max_quantity: u32) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "products" | "ls" => Command::Products,
        "show" => Command::Show(required(rest, "show", "ett produktnamn")?),
        "add" => {
            let (product, quantity) = product_and_quantity(rest, "add", max_quantity)?;
            Command::Add { product, quantity }
        }
        "remove" | "rm" => {
            let (product, quantity) = product_and_quantity(rest, "remove", max_quantity)?;
            Command::Remove { product, quantity }
        }
        "clear" => Command::Clear,
        "cart" => Command::Cart,
        "save" => Command::Save,
        "load" => Command::Load,
        "checkout" => Command::Checkout,
        "back" => Command::Back,
        "discount" => Command::Discount(rest.to_string()),
        "pay" => Command::Pay,
        "receipt" => Command::Receipt,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

fn required(rest: &str, command: &'static str, argument: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    Ok(rest.to_string())
}

/// Splits `<product> [qty]`. A lone token is always the product name.
fn product_and_quantity(
    rest: &str,
    command: &'static str,
    max_quantity: u32,
) -> Result<(String, i64), CommandError> {
    let rest = required(rest, command, "ett produktnamn")?;

    let (product, quantity) = match rest.rsplit_once(char::is_whitespace) {
        Some((name, last)) => match last.parse::<i64>() {
            Ok(qty) => (name.trim().to_string(), qty),
            Err(_) => (rest, 1),
        },
        None => (rest, 1),
    };

    if quantity < 1 || quantity > i64::from(max_quantity) {
        return Err(CommandError::QuantityOutOfRange {
            value: quantity,
            max: max_quantity,
        });
    }

    Ok((product, quantity))
}
