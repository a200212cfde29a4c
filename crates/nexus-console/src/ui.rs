//! UI helper components

use eframe::egui;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 180, 150);

/// Block explorer root for a supported chain id. Unknown chains fall back to
/// Etherscan.
pub fn explorer_base(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "https://etherscan.io",
        10 => "https://optimistic.etherscan.io",
        137 => "https://polygonscan.com",
        42161 => "https://arbiscan.io",
        43114 => "https://snowtrace.io",
        8453 => "https://basescan.org",
        534352 => "https://scrollscan.com",
        _ => "https://etherscan.io",
    }
}

pub fn explorer_address_url(chain_id: u64, address: &str) -> String {
    format!("{}/address/{}", explorer_base(chain_id), address)
}

pub fn explorer_tx_url(chain_id: u64, hash: &str) -> String {
    format!("{}/tx/{}", explorer_base(chain_id), hash)
}

/// Open URL in a new browser tab
#[cfg(target_arch = "wasm32")]
pub fn open_url_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(%url, error = %e, "failed to open browser");
    }
}

/// Copy to clipboard (platform-specific)
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            let _ = clipboard.set_text(text);
        }
        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().clipboard().write_text(text);
    }
}

/// Address rendered as an explorer link with a copy button
pub fn address_link(ui: &mut egui::Ui, chain_id: u64, label: &str, address: &str) {
    ui.horizontal(|ui| {
        let response = ui
            .link(egui::RichText::new(label).monospace())
            .on_hover_text(address);
        if response.clicked() {
            open_url_new_tab(&explorer_address_url(chain_id, address));
        }
        copy_button(ui, address);
    });
}

pub fn copy_button(ui: &mut egui::Ui, text: &str) {
    if ui
        .small_button("📋")
        .on_hover_text("Copy to clipboard")
        .clicked()
    {
        copy_to_clipboard(text);
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(egui::Color32::from_rgb(0, 212, 170)));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(egui::RichText::new(text).strong().size(14.0));
    ui.separator();
}

pub fn address_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0x...")
            .desired_width(400.0)
            .font(egui::TextStyle::Monospace),
    )
}

pub fn amount_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0.0")
            .desired_width(150.0)
            .font(egui::TextStyle::Monospace),
    )
}

pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(220, 80, 80)));
    });
}

pub fn success_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("✅").size(16.0));
        ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(80, 200, 120)));
    });
}

pub fn info_message(ui: &mut egui::Ui, message: &str) {
    ui.label(egui::RichText::new(message).weak().italics());
}

/// Pretty-printed JSON in a scrollable monospace block with a copy button.
pub fn json_view(ui: &mut egui::Ui, id_salt: &str, title: &str, value: &serde_json::Value) {
    let text = pretty_json(value);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(title).strong());
        copy_button(ui, &text);
    });
    egui::ScrollArea::vertical()
        .id_salt(id_salt)
        .max_height(220.0)
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).monospace().size(12.0));
        });
}

pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Transaction hash in an SDK result, under any of the keys the SDK uses.
pub fn result_tx_hash(value: &serde_json::Value) -> Option<&str> {
    ["transactionHash", "hash", "txHash"]
        .iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
}

// =============================================================================
// STYLED BUTTONS
// =============================================================================

/// Primary button with enabled state
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(130.0, 34.0))
        .fill(ACCENT);
    ui.add_enabled(enabled, btn)
}

pub fn secondary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0))
        .min_size(egui::vec2(90.0, 34.0));
    ui.add_enabled(enabled, btn)
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}
