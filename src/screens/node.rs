//! Connection addresses and network privacy toggles

use super::setting_toggle;
use crate::backend::Services;
use crate::tui::{Label, Orientation, Pane, Palette, Screen};
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Restricted RPC port advertised for every network
pub const NODE_PORT: u16 = 18089;

/// Address of the interface holding the default route
///
/// Connecting a UDP socket sends nothing; it only selects a source address.
pub fn clearnet_address() -> IpAddr {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("1.1.1.1:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn address_label(host: &str) -> Label {
    Label::new(format!("{}:{}", host, NODE_PORT), Palette::PURPLE)
}

pub fn screen(services: &Services) -> Screen {
    let onion = services.settings.get_str(&["tor_address"]).unwrap_or_default();
    let i2p = services.settings.get_str(&["i2p_address"]).unwrap_or_default();

    Screen::new("Node")
        .orientation(Orientation::Vertical)
        .placement(0.5, 0.8)
        .item_width(4)
        .entry(
            Pane::new("Clearnet", Palette::BLUE)
                .item(address_label(&clearnet_address().to_string()))
                .item(setting_toggle(services, "Hidden RPC", &[], "anon_rpc")),
        )
        .entry(
            Pane::new("Tor", Palette::BLUE)
                .item(address_label(&onion))
                .item(setting_toggle(services, "Enable Tor", &[], "tor_enabled"))
                .item(setting_toggle(
                    services,
                    "Route All Through Tor",
                    &[],
                    "tor_global_enabled",
                )),
        )
        .entry(
            Pane::new("I2P", Palette::BLUE)
                .item(address_label(&i2p))
                .item(setting_toggle(services, "Enable I2P", &[], "i2p_enabled")),
        )
}
