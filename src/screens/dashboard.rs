//! Read-only status overview fed by the daemon poller and bus signals

use crate::messages::{AppEvent, DaemonInfo, SystemSignal};
use crate::tui::{Component, Label, Message, Orientation, Pane, Palette, Screen};

/// States reported by `serviceStatusReadyNotification`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceStatus {
    pub monerod: String,
    pub tor: String,
    pub i2pd: String,
    pub monero_lws: String,
    pub sshd: String,
    pub moneropay: String,
}

/// Figures reported by `hardwareStatusReadyNotification`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareStatus {
    pub cpu_usage: f32,
    pub cpu_ghz: f32,
    pub ram: f32,
    pub ram_total: f32,
    pub temperature: f32,
    pub ssd: f32,
    pub ssd_total: f32,
    pub emmc: f32,
    pub emmc_total: f32,
    pub uptime: String,
}

fn title_case(word: &str) -> String {
    let mut chars = word.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Parse six `name:state` lines
pub fn parse_services(text: &str) -> Option<ServiceStatus> {
    let states: Vec<String> = text
        .lines()
        .map(|line| title_case(line.split_once(':').map_or("", |(_, state)| state)))
        .collect();
    if states.len() < 6 {
        return None;
    }
    Some(ServiceStatus {
        monerod: states[0].clone(),
        tor: states[1].clone(),
        i2pd: states[2].clone(),
        monero_lws: states[3].clone(),
        sshd: states[4].clone(),
        moneropay: states[5].clone(),
    })
}

/// Parse ten newline-separated figures; unparsable numbers become -1
pub fn parse_hardware(text: &str) -> Option<HardwareStatus> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 10 {
        return None;
    }
    let num = |i: usize| lines[i].trim().parse::<f32>().unwrap_or(-1.0);
    Some(HardwareStatus {
        cpu_usage: num(0),
        cpu_ghz: num(1),
        ram: num(2),
        ram_total: num(3),
        temperature: num(4),
        ssd: num(5),
        ssd_total: num(6),
        emmc: num(7),
        emmc_total: num(8),
        uptime: lines[9].trim().to_string(),
    })
}

fn percent(used: f32, total: f32) -> f32 {
    if total > 0.0 {
        used / total * 100.0
    } else {
        0.0
    }
}

fn rows(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$} : {}", k, v, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn node_text(info: &DaemonInfo) -> String {
    let update = if info.update_available {
        "Update available"
    } else {
        "Up to date"
    };
    let network = if info.offline {
        "Not connected"
    } else {
        "Connected"
    };
    format!(
        "{}\n{}",
        info.sync_status(),
        rows(&[
            ("Block height", info.height.to_string()),
            ("Version", info.version.clone()),
            ("Out peers", info.outgoing_connections_count.to_string()),
            ("In  peers", info.incoming_connections_count.to_string()),
            ("Update", update.to_string()),
            ("Network", network.to_string()),
        ])
    )
}

pub fn services_text(status: &ServiceStatus) -> String {
    rows(&[
        ("Node", status.monerod.clone()),
        ("Tor", status.tor.clone()),
        ("I2P", status.i2pd.clone()),
        ("LWS", status.monero_lws.clone()),
        ("MoneroPay", status.moneropay.clone()),
    ])
}

pub fn hardware_text(hw: &HardwareStatus) -> String {
    rows(&[
        ("CPU", format!("{:.1} Ghz ({:.0}%)", hw.cpu_ghz, hw.cpu_usage)),
        ("Temperature", format!("{:.0}°C", hw.temperature)),
        (
            "RAM",
            format!(
                "{:.1}/{:.1} GB ({:.0}%)",
                hw.ram,
                hw.ram_total,
                percent(hw.ram, hw.ram_total)
            ),
        ),
        (
            "Blockchain",
            format!(
                "{:.1}/{:.1} TB ({:.0}%)",
                hw.ssd,
                hw.ssd_total,
                percent(hw.ssd, hw.ssd_total)
            ),
        ),
        (
            "Storage",
            format!(
                "{:.1}/{:.1} GB ({:.0}%)",
                hw.emmc,
                hw.emmc_total,
                percent(hw.emmc, hw.emmc_total)
            ),
        ),
        ("Uptime", hw.uptime.clone()),
    ])
}

fn node_label() -> Label {
    Label::new("Waiting for daemon...", Palette::YELLOW).on_receive(|label, message, _| {
        match message {
            Message::Async(AppEvent::Daemon(Ok(info))) => {
                label.set_text(format!(
                    "{}\n\nUpdated {}",
                    node_text(info),
                    chrono::Local::now().format("%H:%M:%S")
                ));
                label.set_color(Palette::YELLOW);
            }
            Message::Async(AppEvent::Daemon(Err(reason))) => {
                label.set_text(format!("Daemon unreachable\n{}", reason));
                label.set_color(Palette::ERROR);
            }
            _ => {}
        }
        None
    })
}

fn services_label() -> Label {
    Label::new(services_text(&ServiceStatus::default()), Palette::YELLOW).on_receive(
        |label, message, _| {
            if let Message::Async(AppEvent::Signal(SystemSignal::ServiceStatusReady(text))) =
                message
            {
                match parse_services(text) {
                    Some(status) => label.set_text(services_text(&status)),
                    None => tracing::debug!("Short service status: {:?}", text),
                }
            }
            None
        },
    )
}

fn hardware_label() -> Label {
    Label::new(hardware_text(&HardwareStatus::default()), Palette::YELLOW).on_receive(
        |label, message, _| {
            if let Message::Async(AppEvent::Signal(SystemSignal::HardwareStatusReady(text))) =
                message
            {
                match parse_hardware(text) {
                    Some(hw) => label.set_text(hardware_text(&hw)),
                    None => tracing::debug!("Short hardware status: {:?}", text),
                }
            }
            None
        },
    )
}

pub fn screen() -> Screen {
    Screen::new("Dashboard")
        .orientation(Orientation::Horizontal)
        .placement(0.5, 0.8)
        .entry(Pane::new("Node Status", Palette::PURPLE).item(node_label()))
        .entry(Pane::new("Services", Palette::PURPLE).item(services_label()))
        .entry(Pane::new("Hardware", Palette::PURPLE).item(hardware_label()))
}
