//! Notification mail
//!
//! Each giver gets one templated email naming their recipient. Send failures
//! are per-recipient: they are reported and skipped, never rolling back the
//! pairing or aborting the remaining sends.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::domain::{Pairing, Roster};
use crate::storage::MailConfig;

/// Substitutes `{{ name }}` and `{{ pair }}` placeholders
///
/// Spacing inside the braces is ignored; unknown placeholders are left
/// verbatim.
pub fn render(template: &str, name: &str, pair: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };

        out.push_str(&rest[..start]);
        match after[..end].trim() {
            "name" => out.push_str(name),
            "pair" => out.push_str(pair),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Delivers a single notification
pub trait Mailer {
    /// Notifies `to` that giver `name` has drawn `pair`
    fn notify(&self, to: &str, name: &str, pair: &str) -> Result<()>;
}

/// SMTP-backed [`Mailer`] using the configured templates
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    subject: String,
    body: String,
}

impl SmtpMailer {
    /// Builds the transport from mail configuration
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .with_context(|| format!("Invalid mail_from address: {:?}", config.from))?;

        let (host, port) = config.host_port()?;
        let builder = if config.tls {
            SmtpTransport::starttls_relay(host)
                .with_context(|| format!("Failed to set up STARTTLS for {host:?}"))?
        } else {
            SmtpTransport::builder_dangerous(host)
        };

        let mut builder = builder.port(port);
        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            subject: config.subject.clone(),
            body: config.body.clone(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn notify(&self, to: &str, name: &str, pair: &str) -> Result<()> {
        let to: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {to:?}"))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(render(&self.subject, name, pair))
            .header(ContentType::TEXT_PLAIN)
            .body(render(&self.body, name, pair))
            .context("Failed to build message")?;

        self.transport
            .send(&message)
            .context("Failed to send message")?;
        Ok(())
    }
}

/// Notifies every giver in the pairing
///
/// Returns the failures; the caller decides how to report them. A failure
/// never stops the remaining sends.
pub fn notify_all(
    mailer: &dyn Mailer,
    roster: &Roster,
    pairing: &Pairing,
) -> Vec<(String, anyhow::Error)> {
    let mut failures = Vec::new();

    for (giver, recipient) in pairing.iter() {
        let Some(participant) = roster.get(giver) else {
            continue;
        };
        if let Err(e) = mailer.notify(&participant.email, giver, recipient) {
            failures.push((giver.to_string(), e));
        }
    }

    failures
}
