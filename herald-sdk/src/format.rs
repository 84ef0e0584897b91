//! Chat message formatting.
//!
//! Renders an [`Event`] as a single line of Slack `mrkdwn`:
//!
//! ```text
//! [<https://dnsimple.com/a/1010/account|Example Inc>] john@example.com renewed the domain <https://dnsimple.com/a/1010/domains/example.com|example.com>
//! ```
//!
//! Missing payload fields degrade to placeholders; formatting never fails.

use crate::objects::event::Event;

/// Base URL used for links back to the DNSimple web app.
pub const DNSIMPLE_URL: &str = "https://dnsimple.com";

const UNKNOWN: &str = "unknown";

/// Format the message text for an event.
pub fn format_message(event: &Event) -> String {
    let links = Links::new(event);
    format!(
        "[{}] {} {}",
        links.account(event),
        actor(event),
        action(event, &links)
    )
}

/// Escape the three characters Slack treats as control sequences.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

fn link(url: &str, label: &str) -> String {
    format!("<{}|{}>", url, escape(label))
}

fn actor(event: &Event) -> String {
    let pretty = event
        .actor
        .as_ref()
        .and_then(|a| a.pretty.as_deref())
        .unwrap_or(UNKNOWN);
    escape(pretty)
}

/// Builds links scoped to the event's account, when the account id is known.
struct Links {
    account_url: Option<String>,
}

impl Links {
    fn new(event: &Event) -> Self {
        Self {
            account_url: event
                .account
                .as_ref()
                .and_then(|a| a.id)
                .map(|id| format!("{DNSIMPLE_URL}/a/{id}")),
        }
    }

    fn account(&self, event: &Event) -> String {
        let display = event
            .account
            .as_ref()
            .and_then(|a| a.display.as_deref().or(a.identifier.as_deref()))
            .unwrap_or(UNKNOWN);
        match &self.account_url {
            Some(base) => link(&format!("{base}/account"), display),
            None => escape(display),
        }
    }

    fn scoped(&self, path: &str, label: &str) -> String {
        match &self.account_url {
            Some(base) => link(&format!("{base}/{path}"), label),
            None => escape(label),
        }
    }

    fn domain(&self, name: &str) -> String {
        self.scoped(&format!("domains/{name}"), name)
    }

    fn certificate(&self, domain: Option<&str>, id: Option<&str>, label: &str) -> String {
        match (domain, id) {
            (Some(domain), Some(id)) => {
                self.scoped(&format!("domains/{domain}/certificates/{id}"), label)
            }
            _ => escape(label),
        }
    }

    fn contact(&self, id: Option<&str>, label: &str) -> String {
        match id {
            Some(id) => self.scoped(&format!("contacts/{id}"), label),
            None => escape(label),
        }
    }

    fn zone(&self, zone: &str) -> String {
        self.scoped(&format!("domains/{zone}/records"), zone)
    }
}

fn action(event: &Event, links: &Links) -> String {
    let domain_name = event.data_str("/domain/name").unwrap_or(UNKNOWN);

    match event.name.as_str() {
        "domain.create" => format!("created the domain {}", links.domain(domain_name)),
        "domain.delete" => format!("deleted the domain {}", escape(domain_name)),
        "domain.register" => format!("registered the domain {}", links.domain(domain_name)),
        "domain.renew" => format!("renewed the domain {}", links.domain(domain_name)),
        "domain.transfer" => format!("transferred the domain {}", links.domain(domain_name)),
        "domain.auto_renewal_enable" => format!(
            "enabled auto-renewal for the domain {}",
            links.domain(domain_name)
        ),
        "domain.auto_renewal_disable" => format!(
            "disabled auto-renewal for the domain {}",
            links.domain(domain_name)
        ),
        "domain.delegation_change" => {
            let servers = name_servers(event);
            if servers.is_empty() {
                format!("changed the delegation for the domain {}", links.domain(domain_name))
            } else {
                format!(
                    "changed the delegation for the domain {} to {}",
                    links.domain(domain_name),
                    escape(&servers.join(", "))
                )
            }
        }
        "certificate.issue" | "certificate.reissue" => {
            let verb = if event.name == "certificate.issue" {
                "issued"
            } else {
                "reissued"
            };
            let common_name = event
                .data_str("/certificate/common_name")
                .unwrap_or(UNKNOWN);
            let id = event.data_text("/certificate/id");
            let domain = event
                .data_str("/certificate/domain_name")
                .or(event.data_str("/domain/name"));
            let label = format!("the certificate for {common_name}");
            format!("{verb} {}", links.certificate(domain, id.as_deref(), &label))
        }
        "contact.create" | "contact.update" | "contact.delete" => {
            let verb = match event.name.as_str() {
                "contact.create" => "created",
                "contact.update" => "updated",
                _ => "deleted",
            };
            let label = contact_label(event);
            let id = event.data_text("/contact/id");
            if verb == "deleted" {
                format!("{verb} the contact {}", escape(&label))
            } else {
                format!("{verb} the contact {}", links.contact(id.as_deref(), &label))
            }
        }
        "zone_record.create" | "zone_record.update" | "zone_record.delete" => {
            let verb = match event.name.as_str() {
                "zone_record.create" => "created",
                "zone_record.update" => "updated",
                _ => "deleted",
            };
            let record_type = event.data_str("/zone_record/type").unwrap_or("record");
            let zone = event.data_str("/zone_record/zone_id").unwrap_or(UNKNOWN);
            let record_name = match event.data_str("/zone_record/name") {
                Some("") | None => zone.to_string(),
                Some(name) => format!("{name}.{zone}"),
            };
            let content = event
                .data_str("/zone_record/content")
                .map(|c| format!(" ({})", escape(c)))
                .unwrap_or_default();
            format!(
                "{verb} the {} record {}{} in the zone {}",
                escape(record_type),
                escape(&record_name),
                content,
                links.zone(zone)
            )
        }
        "webhook.create" | "webhook.delete" => {
            let verb = if event.name == "webhook.create" {
                "created"
            } else {
                "deleted"
            };
            let url = event.data_str("/webhook/url").unwrap_or(UNKNOWN);
            format!("{verb} the webhook {}", escape(url))
        }
        other => format!("performed {}", escape(other)),
    }
}

fn contact_label(event: &Event) -> String {
    if let Some(label) = event.data_str("/contact/label").filter(|l| !l.is_empty()) {
        return label.to_string();
    }
    let first = event.data_str("/contact/first_name").unwrap_or_default();
    let last = event.data_str("/contact/last_name").unwrap_or_default();
    let full = format!("{first} {last}");
    let full = full.trim();
    if full.is_empty() {
        UNKNOWN.to_string()
    } else {
        full.to_string()
    }
}

fn name_servers(event: &Event) -> Vec<&str> {
    event
        .data
        .pointer("/name_servers")
        .and_then(serde_json::Value::as_array)
        .map(|servers| servers.iter().filter_map(serde_json::Value::as_str).collect())
        .unwrap_or_default()
}
