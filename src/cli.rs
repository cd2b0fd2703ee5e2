//! Line-oriented command interface for driving the wizard from a terminal.

use crate::error::WizardError;
use crate::services::DocumentSlot;
use crate::signup::guidance;
use crate::signup::model::{Choice, fields};
use crate::signup::steps::{self, business, contact, payment, verification};
use crate::signup::{FormPatch, Navigation, Step, WizardController};

pub const HELP: &str = "\
Commands:
  set <field> <value>     set a form field (e.g. set businessName Acme)
  clear <field>           empty a form field
  toggle <method> on|off  accept or drop a payment method (e.g. toggle visa on)
  popular                 accept the popular payment methods
  mcc [code]              list category suggestions, or apply one
  describe                suggest a business description
  upload license|ownership
  options                 list the choices for the current step
  next | back | status | guide | show | reset | help | quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: String, value: String },
    Toggle { method: String, enabled: bool },
    PopularMethods,
    Category(Option<String>),
    Describe,
    Upload(DocumentSlot),
    Next,
    Back,
    Status,
    Guide,
    Options,
    Show,
    Reset,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head.to_lowercase().as_str() {
            "set" => match rest.split_once(char::is_whitespace) {
                Some((field, value)) => Command::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                },
                None => Command::Invalid("usage: set <field> <value>".into()),
            },
            "clear" if !rest.is_empty() => Command::Set {
                field: rest.to_string(),
                value: String::new(),
            },
            "toggle" => parse_toggle(rest),
            "popular" => Command::PopularMethods,
            "mcc" => Command::Category((!rest.is_empty()).then(|| rest.to_string())),
            "describe" | "suggest" => Command::Describe,
            "upload" => match rest.to_lowercase().as_str() {
                "license" => Command::Upload(DocumentSlot::BusinessLicense),
                "ownership" => Command::Upload(DocumentSlot::OwnershipDocument),
                _ => Command::Invalid("usage: upload license|ownership".into()),
            },
            "next" | "submit" => Command::Next,
            "back" | "previous" | "prev" => Command::Back,
            "status" => Command::Status,
            "guide" => Command::Guide,
            "options" => Command::Options,
            "show" => Command::Show,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Invalid(format!("unknown command {trimmed:?}, type 'help'")),
        }
    }
}

fn parse_toggle(rest: &str) -> Command {
    let mut parts = rest.split_whitespace();
    let (Some(method), Some(state), None) = (parts.next(), parts.next(), parts.next()) else {
        return Command::Invalid("usage: toggle <method> on|off".into());
    };
    let enabled = match state.to_lowercase().as_str() {
        "on" | "yes" | "true" => true,
        "off" | "no" | "false" => false,
        _ => return Command::Invalid("usage: toggle <method> on|off".into()),
    };
    Command::Toggle {
        method: method.to_lowercase(),
        enabled,
    }
}

/// Run one command against the wizard and return the text to show.
pub async fn execute(controller: &mut WizardController, command: Command) -> String {
    match run(controller, command).await {
        Ok(text) => text,
        Err(e @ WizardError::UploadFailed(_)) => e.to_string(),
        Err(e) if e.is_retryable() => format!("{e}. Type 'next' to try again."),
        Err(e) => e.to_string(),
    }
}

async fn run(controller: &mut WizardController, command: Command) -> Result<String, WizardError> {
    match command {
        Command::Set { field, value } => {
            let patch = FormPatch::field(&field, field_value(&field, value))
                .map_err(|e| WizardError::InvalidPatch(e.to_string()))?;
            controller.update_form_data(patch).await;
            Ok(status_line(controller))
        }
        Command::Toggle { method, enabled } => {
            let note = if payment::payment_method(&method).is_none() {
                format!(" (note: {method:?} is not a listed payment method)")
            } else {
                String::new()
            };
            controller.toggle_payment_method(&method, enabled).await;
            Ok(format!("{}{note}", methods_line(controller)))
        }
        Command::PopularMethods => {
            controller.suggest_popular_payment_methods().await;
            Ok(methods_line(controller))
        }
        Command::Category(None) => Ok(business::CATEGORY_SUGGESTIONS
            .iter()
            .map(|s| format!("  {}", s.field_value()))
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Category(Some(code)) => {
            controller.apply_category_suggestion(&code).await?;
            Ok(format!(
                "Category code: {}",
                controller.record().business.category_code
            ))
        }
        Command::Describe => {
            controller.suggest_description().await?;
            Ok(format!(
                "Description: {}",
                controller.record().business.description
            ))
        }
        Command::Upload(slot) => {
            let name = controller.upload_document(slot).await?;
            Ok(format!("Uploaded {name}"))
        }
        Command::Next => match controller.next().await? {
            Navigation::Advanced(_) => Ok(status_line(controller)),
            Navigation::Submitted(receipt) => Ok(format!(
                "Application submitted (reference {}). The form has been reset.",
                receipt.reference
            )),
        },
        Command::Back => {
            controller.previous();
            Ok(status_line(controller))
        }
        Command::Status => Ok(status_line(controller)),
        Command::Guide => Ok(guidance::render(controller.step())),
        Command::Options => Ok(step_options(controller)),
        Command::Show => {
            let mut record = controller.record().clone();
            record.banking.account_number = record.banking.masked_account_number();
            serde_json::to_string_pretty(&record).map_err(|e| WizardError::InvalidPatch(e.to_string()))
        }
        Command::Reset => {
            controller.reset().await;
            Ok(status_line(controller))
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
        Command::Invalid(msg) => Ok(msg),
    }
}

/// List fields take a comma-separated value; everything else is plain text.
fn field_value(field: &str, value: String) -> serde_json::Value {
    if field == fields::PAYMENT_METHODS || field == fields::OWNERSHIP_DOCUMENTS {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| serde_json::Value::String(item.to_string()))
            .collect()
    } else {
        serde_json::Value::String(value)
    }
}

/// Progress, current heading and what still blocks the next step.
pub fn status_line(controller: &WizardController) -> String {
    let status = controller.status();
    let page = steps::page(status.step);
    let mut lines = vec![format!(
        "{} ({}% complete): {}",
        status.progress_label(),
        status.progress_percent(),
        page.heading
    )];

    let missing = controller.missing_fields();
    if missing.is_empty() {
        let action = if status.step.is_final() { "submit" } else { "continue" };
        lines.push(format!("Ready, type 'next' to {action}."));
    } else {
        lines.push(format!("Still needed: {}", missing.join(", ")));
    }

    if status.step == Step::ContactAddress && !contact::state_matches_country(controller.record()) {
        lines.push(format!(
            "Note: {:?} is not a US state.",
            controller.record().address.state
        ));
    }
    if status.step.is_final() {
        for item in verification::review_checklist(controller.record()) {
            let mark = if item.complete { "x" } else { " " };
            lines.push(format!("  [{mark}] {}", item.label));
        }
    }
    if status.persistence_degraded {
        lines.push("Warning: progress is not being saved.".to_string());
    }
    lines.join("\n")
}

fn labels<T: Choice>(options: &[T]) -> String {
    options
        .iter()
        .map(|option| option.label())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Choices offered on the current step.
pub fn step_options(controller: &WizardController) -> String {
    let record = controller.record();
    let mut lines = Vec::new();
    match controller.step() {
        Step::BusinessInfo => {
            lines.push(format!(
                "businessType: {}",
                labels(business::business_type_options())
            ));
            lines.push("merchantCategoryCode (mcc <code>):".to_string());
            for suggestion in business::CATEGORY_SUGGESTIONS {
                lines.push(format!("  {}", suggestion.field_value()));
            }
        }
        Step::ContactAddress => {
            lines.push(format!("country: {}", labels(contact::country_options())));
            match contact::state_input(record) {
                contact::StateInput::Select(states) => {
                    lines.push(format!("state: {}", states.join(", ")))
                }
                contact::StateInput::FreeText => {
                    lines.push("state: free text".to_string())
                }
            }
        }
        Step::PaymentBanking => {
            lines.push(format!("monthlyVolume: {}", labels(payment::volume_options())));
            lines.push("paymentMethods (toggle <id> on|off, * = popular):".to_string());
            for option in payment::PAYMENT_METHOD_OPTIONS {
                let star = if option.popular { "*" } else { " " };
                lines.push(format!("  {star} {:<14} {}", option.id, option.label));
            }
        }
        Step::Verification => {
            lines.push("Documents: upload license | upload ownership".to_string());
            lines.push("After you submit:".to_string());
            for next in verification::NEXT_STEPS {
                lines.push(format!("  - {next}"));
            }
        }
    }
    lines.join("\n")
}

fn methods_line(controller: &WizardController) -> String {
    let methods = &controller.record().payment.methods;
    if methods.is_empty() {
        "Payment methods: none".to_string()
    } else {
        let names: Vec<&str> = methods.iter().map(String::as_str).collect();
        format!("Payment methods: {}", names.join(", "))
    }
}
