mod config;
mod document;
mod invoice_gen;
mod models;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::document::build_document;
use crate::invoice_gen::InvoiceGenerator;
use crate::ui::form::{handle_input as handle_form_input, render_form, FormAction, FormState};

#[derive(Parser)]
#[command(name = "invoice-generator")]
struct Cli {
    /// Directory for generated invoices (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| config.output_dir().to_string());
    let generator = InvoiceGenerator::new(&output_dir)?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create the form over a blank invoice; the aggregate lives for exactly
    // this session
    let mut form_state = FormState::new();

    // Run the main app loop
    let result = run_app(&mut terminal, &mut form_state, &generator);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    println!("Thanks for using Invoice Generator!");

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    form_state: &mut FormState,
    generator: &InvoiceGenerator,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_form(f, form_state))?;

        match handle_form_input(form_state)? {
            Some(FormAction::Exit) => break,
            Some(FormAction::Generate) => {
                // Snapshot the aggregate into a document description; the
                // renderer never feeds back into the model.
                let document = build_document(form_state.invoice());
                let stem = form_state.invoice().filename_stem().to_string();

                match generator.generate(&document, &stem) {
                    Ok(path) => {
                        form_state.set_status(format!("Saved {}", path.display()));
                    }
                    Err(err) => {
                        form_state.set_error(format!("{} — press G to try again", err));
                    }
                }
            }
            None => {}
        }
    }

    Ok(())
}
