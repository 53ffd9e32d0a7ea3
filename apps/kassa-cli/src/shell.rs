//! # Shell
//!
//! The interactive command loop. Reads one command per line, runs it
//! against the [`Session`] and prints the result.
//!
//! ## Command Availability
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                     Shopping        CheckingOut                │
//! │  ───────────────────────     ────────        ───────────                │
//! │  add remove clear save load     ✅               ❌                      │
//! │  checkout                       ✅               ❌                      │
//! │  discount pay back              ❌               ✅                      │
//! │  products show cart receipt     ✅               ✅                      │
//! │  help quit                      ✅               ✅                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quitting With an Unsaved Cart
//! `save_on_exit` decides: `always` saves, `never` discards and `ask`
//! prompts for save / discard / cancel. At end of input there is nobody to
//! ask, so `ask` saves.

use std::io::{self, BufRead, Write};

use kassa_core::{CoreError, RejectedLine, Session, ShoppingMode};
use kassa_store::{Store, StoreError};
use tracing::{debug, info, warn};

use crate::commands::{self, Command, HELP};
use crate::config::{AppConfig, SaveOnExit};

const SAVE_PROMPT: &str = "Du har varor i varukorgen. Vill du spara innan du avslutar? [j]a / [n]ej / [a]vbryt";
const SAVED: &str = "Din kundvagn har sparats utan bekymmer";
const LOCKED_WHILE_CHECKING_OUT: &str = "Du är i kassan. Skriv 'back' för att fortsätta handla.";
const NOT_CHECKING_OUT: &str = "Gå till kassan först med 'checkout'.";

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Answer to the save-before-exit prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitChoice {
    Save,
    Discard,
    Cancel,
}

/// The interactive front end.
pub struct Shell<R, W> {
    session: Session,
    store: Store,
    config: AppConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, store: Store, config: AppConfig, input: R, output: W) -> Self {
        Shell {
            session,
            store,
            config,
            input,
            output,
        }
    }

    /// Hands back the session and the output, for inspection after `run`.
    #[cfg(test)]
    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.output)
    }

    /// Prints what was skipped while opening the session.
    pub fn report_startup(
        &mut self,
        rejected_products: &[RejectedLine],
        rejected_codes: &[RejectedLine],
        cart_error: Option<&StoreError>,
    ) -> io::Result<()> {
        for rejected in rejected_products {
            writeln!(self.output, "Produkt hoppades över, {}", rejected)?;
        }
        for rejected in rejected_codes {
            writeln!(self.output, "Kod stämmer ej: '{}'", rejected.content)?;
        }
        if let Some(e) = cart_error {
            writeln!(self.output, "Sparad varukorg kunde inte läsas: {}", e)?;
        }
        Ok(())
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Välkommen till {}! Skriv 'help' för att se kommandon.",
            self.config.store.name
        )?;

        loop {
            let prompt = match self.session.mode() {
                ShoppingMode::Shopping => "kassa> ",
                ShoppingMode::CheckingOut => "kassa (kassan)> ",
            };
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                self.quit_at_end_of_input()?;
                return Ok(());
            };

            match commands::parse(&line, self.config.session.max_selector_quantity) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    if self.execute(command)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    // =========================================================================
    // Command Dispatch
    // =========================================================================

    fn execute(&mut self, command: Command) -> io::Result<Flow> {
        debug!(?command, mode = %self.session.mode(), "Executing command");

        match command {
            Command::Products => self.list_products()?,
            Command::Show(name) => self.show_product(&name)?,
            Command::Add { product, quantity } => {
                if self.require_shopping()? {
                    let result = self.session.add_to_cart(&product, quantity);
                    self.after_cart_edit(result)?;
                }
            }
            Command::Remove { product, quantity } => {
                if self.require_shopping()? {
                    let result = self.session.remove_from_cart(&product, quantity);
                    self.after_cart_edit(result)?;
                }
            }
            Command::Clear => {
                if self.require_shopping()? && !self.session.cart().is_empty() {
                    self.session.clear_cart();
                    writeln!(self.output, "Varukorgen är tömd.")?;
                }
            }
            Command::Cart => self.print_cart()?,
            Command::Save => {
                if self.require_shopping()? && !self.session.cart().is_empty() && self.save_cart()? {
                    writeln!(self.output, "{}", SAVED)?;
                }
            }
            Command::Load => {
                if self.require_shopping()? {
                    self.load_cart()?;
                }
            }
            Command::Checkout => self.checkout()?,
            Command::Back => match self.session.resume_shopping() {
                Ok(()) => writeln!(self.output, "Fortsätt handla.")?,
                Err(_) => writeln!(self.output, "Du handlar redan.")?,
            },
            Command::Discount(code) => {
                if self.require_checking_out()? {
                    self.apply_discount(&code)?;
                }
            }
            Command::Pay => {
                if self.require_checking_out()? {
                    self.pay()?;
                }
            }
            Command::Receipt => self.print_receipt()?,
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => return self.quit(),
        }

        Ok(Flow::Continue)
    }

    fn require_shopping(&mut self) -> io::Result<bool> {
        if self.session.mode().allows_cart_edits() {
            return Ok(true);
        }
        writeln!(self.output, "{}", LOCKED_WHILE_CHECKING_OUT)?;
        Ok(false)
    }

    fn require_checking_out(&mut self) -> io::Result<bool> {
        if self.session.mode().allows_payment() {
            return Ok(true);
        }
        writeln!(self.output, "{}", NOT_CHECKING_OUT)?;
        Ok(false)
    }

    fn report(&mut self, error: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "Fel: {}", error)
    }

    // =========================================================================
    // Products and Cart
    // =========================================================================

    fn list_products(&mut self) -> io::Result<()> {
        writeln!(self.output, "Produktutbud:")?;
        for product in self.session.catalog() {
            writeln!(self.output, "  {:<24} {}", product.name(), product.price_label())?;
        }
        Ok(())
    }

    fn show_product(&mut self, name: &str) -> io::Result<()> {
        match self.session.catalog().find_by_name(name) {
            Ok(product) => {
                let text = format!(
                    "{}\n{}\n{}",
                    product.name(),
                    product.description(),
                    product.price_label()
                );
                writeln!(self.output, "{}", text)
            }
            Err(e) => self.report(&e),
        }
    }

    fn after_cart_edit(&mut self, result: Result<(), CoreError>) -> io::Result<()> {
        match result {
            Ok(()) => self.print_cart(),
            Err(e) => self.report(&e),
        }
    }

    fn print_cart(&mut self) -> io::Result<()> {
        if self.session.cart().is_empty() {
            return writeln!(self.output, "Varukorgen är tom.");
        }

        writeln!(self.output, "Varukorg:")?;
        for line in self.session.cart().lines() {
            writeln!(self.output, "  {}, {}", line.product_name, line.quantity)?;
        }
        Ok(())
    }

    /// Writes the cart to disk. Returns whether it worked.
    fn save_cart(&mut self) -> io::Result<bool> {
        match self.store.cart().save(self.session.cart()) {
            Ok(()) => {
                self.session.mark_saved();
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Saving cart failed");
                self.report(&e)?;
                Ok(false)
            }
        }
    }

    fn load_cart(&mut self) -> io::Result<()> {
        let restored = match self.store.cart().load(self.session.catalog()) {
            Ok(cart) => cart,
            Err(e) => return self.report(&e),
        };

        if restored.is_empty() {
            return writeln!(self.output, "Det finns ingen sparad varukorg.");
        }

        match self.session.restore_cart(&restored) {
            Ok(()) => self.print_cart(),
            Err(e) => self.report(&e),
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    fn checkout(&mut self) -> io::Result<()> {
        match self.session.begin_checkout() {
            Ok(receipt) => {
                let text = receipt.render();
                writeln!(self.output, "Kassa\n{}", text)
            }
            Err(CoreError::EmptyCart) => writeln!(self.output, "Varukorgen är tom."),
            Err(CoreError::InvalidMode { .. }) => writeln!(self.output, "Du är redan i kassan."),
            Err(e) => self.report(&e),
        }
    }

    fn apply_discount(&mut self, code: &str) -> io::Result<()> {
        let outcome = self.session.apply_discount(code.trim());
        debug!(?outcome, "Discount code entered");

        if let Some(notice) = outcome.notice() {
            writeln!(self.output, "{}", notice)?;
        }
        if outcome.is_applied() {
            if let Some(receipt) = self.session.checkout_receipt() {
                let text = receipt.render();
                writeln!(self.output, "{}", text)?;
            }
        }
        Ok(())
    }

    fn pay(&mut self) -> io::Result<()> {
        match self.session.complete_payment() {
            Ok(purchase) => {
                info!(
                    total = purchase.receipt.total.kronor(),
                    code = ?purchase.redeemed_code.as_ref().map(|c| c.as_str()),
                    "Payment completed"
                );
                writeln!(
                    self.output,
                    "Ditt kvitto ({})\n{}",
                    purchase.completed_at.format("%Y-%m-%d %H:%M"),
                    purchase.receipt.render()
                )
            }
            Err(e) => self.report(&e),
        }
    }

    fn print_receipt(&mut self) -> io::Result<()> {
        let text = match self.session.checkout_receipt() {
            Some(receipt) => receipt.render(),
            None => match self.session.receipt() {
                Ok(receipt) => receipt.render(),
                Err(e) => return self.report(&e),
            },
        };
        writeln!(self.output, "{}", text)
    }

    // =========================================================================
    // Exit
    // =========================================================================

    fn quit(&mut self) -> io::Result<Flow> {
        if !self.session.needs_save_prompt() {
            return Ok(Flow::Quit);
        }

        let choice = match self.config.session.save_on_exit {
            SaveOnExit::Always => ExitChoice::Save,
            SaveOnExit::Never => ExitChoice::Discard,
            SaveOnExit::Ask => self.ask_exit_choice()?,
        };

        match choice {
            ExitChoice::Save if self.save_cart()? => Ok(Flow::Quit),
            ExitChoice::Save | ExitChoice::Cancel => Ok(Flow::Continue),
            ExitChoice::Discard => {
                info!(entries = self.session.cart().len(), "Quitting without saving cart");
                Ok(Flow::Quit)
            }
        }
    }

    fn ask_exit_choice(&mut self) -> io::Result<ExitChoice> {
        writeln!(self.output, "{}", SAVE_PROMPT)?;
        self.output.flush()?;

        let choice = match self.read_line()? {
            None => ExitChoice::Save,
            Some(answer) => match answer.trim().to_lowercase().as_str() {
                "j" | "ja" | "y" | "yes" => ExitChoice::Save,
                "n" | "nej" | "no" => ExitChoice::Discard,
                _ => ExitChoice::Cancel,
            },
        };
        Ok(choice)
    }

    fn quit_at_end_of_input(&mut self) -> io::Result<()> {
        if !self.session.needs_save_prompt() {
            return Ok(());
        }

        match self.config.session.save_on_exit {
            SaveOnExit::Never => Ok(()),
            SaveOnExit::Always | SaveOnExit::Ask => {
                self.save_cart()?;
                Ok(())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
