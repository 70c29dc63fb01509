use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{ClientField, Invoice, PaymentField, ServiceLineField};

// Represents a field in the invoice form, in navigation order
#[derive(Clone, Copy, PartialEq)]
pub enum FormField {
    ClientName,
    ClientCompany,
    ClientAddress,
    ClientEmail,
    ClientPhone,
    Services,
    PaymentMethod,
    PaymentTransactionId,
    PaymentKind,
    PaymentRemaining,
}

// A scalar form field mapped onto the model operation it drives
enum FieldTarget {
    Client(ClientField),
    Payment(PaymentField),
}

impl FormField {
    fn target(self) -> Option<FieldTarget> {
        match self {
            FormField::ClientName => Some(FieldTarget::Client(ClientField::Name)),
            FormField::ClientCompany => Some(FieldTarget::Client(ClientField::Company)),
            FormField::ClientAddress => Some(FieldTarget::Client(ClientField::Address)),
            FormField::ClientEmail => Some(FieldTarget::Client(ClientField::Email)),
            FormField::ClientPhone => Some(FieldTarget::Client(ClientField::Phone)),
            FormField::Services => None,
            FormField::PaymentMethod => Some(FieldTarget::Payment(PaymentField::Method)),
            FormField::PaymentTransactionId => {
                Some(FieldTarget::Payment(PaymentField::TransactionId))
            }
            FormField::PaymentKind => Some(FieldTarget::Payment(PaymentField::Kind)),
            FormField::PaymentRemaining => Some(FieldTarget::Payment(PaymentField::Remaining)),
        }
    }
}

// Represents the single-page form state
pub struct FormState {
    invoice: Invoice,
    current_field: FormField,
    editing: bool,
    lines_list_state: ListState,
    editing_line_field: Option<ServiceLineField>,
    show_error: Option<String>,
    status: Option<String>,
}

pub enum FormAction {
    Exit,
    Generate,
}

impl FormState {
    pub fn new() -> Self {
        Self::with_invoice(Invoice::new())
    }

    pub fn with_invoice(invoice: Invoice) -> Self {
        let mut lines_list_state = ListState::default();
        lines_list_state.select(Some(0));

        Self {
            invoice,
            current_field: FormField::ClientName,
            editing: false,
            lines_list_state,
            editing_line_field: None,
            show_error: None,
            status: None,
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    pub fn set_error(&mut self, message: String) {
        self.show_error = Some(message);
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ClientName => FormField::ClientCompany,
            FormField::ClientCompany => FormField::ClientAddress,
            FormField::ClientAddress => FormField::ClientEmail,
            FormField::ClientEmail => FormField::ClientPhone,
            FormField::ClientPhone => FormField::Services,
            FormField::Services => FormField::PaymentMethod,
            FormField::PaymentMethod => FormField::PaymentTransactionId,
            FormField::PaymentTransactionId => FormField::PaymentKind,
            FormField::PaymentKind => FormField::PaymentRemaining,
            FormField::PaymentRemaining => FormField::ClientName,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ClientName => FormField::PaymentRemaining,
            FormField::ClientCompany => FormField::ClientName,
            FormField::ClientAddress => FormField::ClientCompany,
            FormField::ClientEmail => FormField::ClientAddress,
            FormField::ClientPhone => FormField::ClientEmail,
            FormField::Services => FormField::ClientPhone,
            FormField::PaymentMethod => FormField::Services,
            FormField::PaymentTransactionId => FormField::PaymentMethod,
            FormField::PaymentKind => FormField::PaymentTransactionId,
            FormField::PaymentRemaining => FormField::PaymentKind,
        };
    }

    // Browsing the service line list: services section focused and being
    // edited, but no individual line field open yet
    fn in_services_browse(&self) -> bool {
        self.current_field == FormField::Services
            && self.editing
            && self.editing_line_field.is_none()
    }

    pub fn next_line(&mut self) {
        let len = self.invoice.service_lines().len();
        let i = match self.lines_list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.lines_list_state.select(Some(i));
    }

    pub fn previous_line(&mut self) {
        let len = self.invoice.service_lines().len();
        let i = match self.lines_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.lines_list_state.select(Some(i));
    }

    pub fn add_line(&mut self) {
        self.invoice.add_service_line();
        self.lines_list_state
            .select(Some(self.invoice.service_lines().len() - 1));
        self.editing_line_field = Some(ServiceLineField::Description);
    }

    pub fn remove_selected_line(&mut self) {
        if let Some(selected) = self.lines_list_state.selected() {
            // The model guards the minimum-length-1 invariant; removing the
            // last line quietly does nothing.
            match self.invoice.remove_service_line(selected) {
                Ok(()) => {
                    let len = self.invoice.service_lines().len();
                    if selected >= len {
                        self.lines_list_state.select(Some(len - 1));
                    }
                }
                Err(e) => {
                    self.show_error = Some(e.to_string());
                }
            }
        }
    }

    pub fn begin_line_edit(&mut self) {
        if self.lines_list_state.selected().is_some() {
            self.editing_line_field = Some(ServiceLineField::Description);
        }
    }

    // Advance to the next field within the selected line; editing ends after
    // the total field
    pub fn next_line_field(&mut self) {
        self.editing_line_field = match self.editing_line_field {
            Some(ServiceLineField::Description) => Some(ServiceLineField::Hours),
            Some(ServiceLineField::Hours) => Some(ServiceLineField::Rate),
            Some(ServiceLineField::Rate) => Some(ServiceLineField::Total),
            Some(ServiceLineField::Total) | None => None,
        };
    }

    // Apply one keystroke to whichever field is open. Every edit goes through
    // a model operation and the next draw re-displays the aggregate verbatim.
    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        if let Some(line_field) = self.editing_line_field {
            if let Some(idx) = self.lines_list_state.selected() {
                let current = self
                    .invoice
                    .service_lines()
                    .get(idx)
                    .map(|line| line.field(line_field).to_string());
                if let Some(current) = current {
                    if let Some(next) = edited_value(&current, key) {
                        if let Err(e) = self.invoice.set_service_line_field(idx, line_field, &next)
                        {
                            self.show_error = Some(e.to_string());
                        }
                    }
                }
            }
            return;
        }

        match self.current_field.target() {
            Some(FieldTarget::Client(field)) => {
                let current = self.invoice.client().field(field).to_string();
                if let Some(next) = edited_value(&current, key) {
                    self.invoice.set_client_field(field, &next);
                }
            }
            Some(FieldTarget::Payment(field)) => {
                let current = self.invoice.payment().field(field).to_string();
                if let Some(next) = edited_value(&current, key) {
                    self.invoice.set_payment_field(field, &next);
                }
            }
            None => {}
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

// One keystroke applied to a text value; None when the key isn't an edit
fn edited_value(current: &str, key: KeyCode) -> Option<String> {
    match key {
        KeyCode::Char(c) => {
            let mut value = current.to_string();
            value.push(c);
            Some(value)
        }
        KeyCode::Backspace => {
            let mut value = current.to_string();
            value.pop();
            Some(value)
        }
        _ => None,
    }
}

pub fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Length(7), // Client
                Constraint::Min(5),    // Services
                Constraint::Length(6), // Payment
                Constraint::Length(4), // Totals
                Constraint::Length(3), // Help / status
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(format!(
        "Invoice Generator — {}",
        state.invoice.invoice_date().format("%Y-%m-%d")
    ))
    .style(Style::default().fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_client_section(frame, state, chunks[1]);
    render_services_section(frame, state, chunks[2]);
    render_payment_section(frame, state, chunks[3]);
    render_totals_section(frame, state, chunks[4]);
    render_help(frame, state, chunks[5]);

    // Show error if needed
    if let Some(error) = &state.show_error {
        render_error(frame, frame.size(), error);
    }
}

fn scalar_line<'a>(state: &FormState, field: FormField, label: &'a str, value: &str) -> Spans<'a> {
    let focused = state.current_field == field;
    let label_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let display = if focused && state.editing {
        format!("{}|", value)
    } else {
        value.to_string()
    };

    Spans::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(display),
    ])
}

fn render_client_section<B: Backend>(frame: &mut Frame<B>, state: &FormState, area: Rect) {
    let client = state.invoice.client();
    let lines = vec![
        scalar_line(state, FormField::ClientName, "Client Name", &client.name),
        scalar_line(state, FormField::ClientCompany, "Company", &client.company),
        scalar_line(state, FormField::ClientAddress, "Address", &client.address),
        scalar_line(state, FormField::ClientEmail, "Email", &client.email),
        scalar_line(state, FormField::ClientPhone, "Phone", &client.phone),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Client Details").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_services_section<B: Backend>(frame: &mut Frame<B>, state: &mut FormState, area: Rect) {
    let focused = state.current_field == FormField::Services;
    let block = Block::default()
        .title(if focused { "Services (selected)" } else { "Services" })
        .borders(Borders::ALL)
        .style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    let selected = state.lines_list_state.selected();
    let items = state
        .invoice
        .service_lines()
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let cursor = |field: ServiceLineField, value: &str| -> String {
                if selected == Some(idx) && state.editing_line_field == Some(field) {
                    format!("{}|", value)
                } else {
                    value.to_string()
                }
            };

            ListItem::new(format!(
                "{} | hours: {} | rate: {} | total: {}",
                cursor(ServiceLineField::Description, &line.description),
                cursor(ServiceLineField::Hours, &line.hours),
                cursor(ServiceLineField::Rate, &line.rate),
                cursor(ServiceLineField::Total, &line.total),
            ))
        })
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, area, &mut state.lines_list_state);
}

fn render_payment_section<B: Backend>(frame: &mut Frame<B>, state: &FormState, area: Rect) {
    let payment = state.invoice.payment();
    let lines = vec![
        scalar_line(state, FormField::PaymentMethod, "Payment Method", &payment.method),
        scalar_line(
            state,
            FormField::PaymentTransactionId,
            "Transaction ID",
            &payment.transaction_id,
        ),
        scalar_line(state, FormField::PaymentKind, "Payment Type", &payment.kind),
        scalar_line(
            state,
            FormField::PaymentRemaining,
            "Remaining Payment",
            &payment.remaining,
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Payment Details").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_totals_section<B: Backend>(frame: &mut Frame<B>, state: &FormState, area: Rect) {
    let lines = vec![
        Spans::from(format!("Subtotal: {}", state.invoice.subtotal())),
        Spans::from(Span::styled(
            format!("Grand Total: {}", state.invoice.grand_total()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Totals").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help<B: Backend>(frame: &mut Frame<B>, state: &FormState, area: Rect) {
    let help_text = if let Some(status) = &state.status {
        status.clone()
    } else {
        match (state.editing, state.current_field, state.editing_line_field) {
            (false, _, _) => {
                "Enter - Edit field | Up/Down - Navigate | G - Generate PDF | Esc - Quit".to_string()
            }
            (true, FormField::Services, None) => {
                "A - Add line | D - Remove line | Enter - Edit line | Up/Down - Select | Esc - Done"
                    .to_string()
            }
            (true, FormField::Services, Some(_)) => {
                "Type to edit | Enter/Tab - Next field | Esc - Done".to_string()
            }
            (true, _, _) => "Type to edit | Enter - Save field | Esc - Cancel editing".to_string(),
        }
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn render_error<B: Backend>(frame: &mut Frame<B>, size: Rect, error: &str) {
    let popup_area = centered_rect(60, 20, size);

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red));

    frame.render_widget(error_msg, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut FormState) -> Result<Option<FormAction>> {
    // Clear any existing error message
    state.show_error = None;

    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing_line_field.is_some() {
                    state.editing_line_field = None;
                } else if state.editing {
                    state.editing = false;
                } else {
                    return Ok(Some(FormAction::Exit));
                }
            }
            KeyCode::Enter => {
                if state.editing_line_field.is_some() {
                    state.next_line_field();
                } else if state.editing {
                    if state.current_field == FormField::Services {
                        state.begin_line_edit();
                    } else {
                        state.editing = false;
                    }
                } else {
                    state.editing = true;
                }
            }
            KeyCode::Tab if state.editing_line_field.is_some() => {
                state.next_line_field();
            }
            KeyCode::Char('g') | KeyCode::Char('G') if !state.editing => {
                state.status = None;
                return Ok(Some(FormAction::Generate));
            }
            KeyCode::Char('a') | KeyCode::Char('A') if state.in_services_browse() => {
                state.add_line();
            }
            KeyCode::Char('d') | KeyCode::Char('D') if state.in_services_browse() => {
                state.remove_selected_line();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Up if state.in_services_browse() => {
                state.previous_line();
            }
            KeyCode::Down if state.in_services_browse() => {
                state.next_line();
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}
