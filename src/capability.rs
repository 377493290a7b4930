use crate::config::RendererMode;

#[derive(Debug, Clone)]
pub struct CapabilityReport {
    pub auto_probe: bool,
    pub requested_renderer: RendererMode,
    pub renderer: RendererMode,
    notes: Vec<String>,
}

impl CapabilityReport {
    pub fn changed(&self) -> bool {
        self.renderer != self.requested_renderer
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn status_label(&self) -> String {
        if !self.auto_probe {
            return format!("off ({:?})", self.renderer);
        }
        if self.changed() {
            return format!(
                "fallback {:?}->{:?}",
                self.requested_renderer, self.renderer
            );
        }
        format!("ok {:?}", self.renderer)
    }
}

pub fn probe_renderer(requested: RendererMode, auto_probe: bool) -> CapabilityReport {
    probe_with(requested, auto_probe, |k| std::env::var(k).ok())
}

/// Same as [`probe_renderer`] with an injectable environment lookup.
pub fn probe_with(
    requested: RendererMode,
    auto_probe: bool,
    env: impl Fn(&str) -> Option<String>,
) -> CapabilityReport {
    let mut report = CapabilityReport {
        auto_probe,
        requested_renderer: requested,
        renderer: requested,
        notes: Vec::new(),
    };

    if !auto_probe {
        report.push_note("capability probe disabled by --auto-probe=false");
        return report;
    }

    if requested == RendererMode::Kitty && !kitty_graphics_available(&env) {
        report.renderer = RendererMode::HalfBlock;
        report.push_note("kitty graphics unavailable in this terminal; falling back to half-block");
    }

    report
}

fn kitty_graphics_available(env: &impl Fn(&str) -> Option<String>) -> bool {
    if let Some(v) = env("ACIDWARP_FORCE_KITTY") {
        match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => return true,
            "0" | "false" | "no" | "off" => return false,
            _ => {}
        }
    }

    if env("KITTY_WINDOW_ID").is_some() {
        return true;
    }

    let term = env("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("kitty") {
        return true;
    }

    let program = env("TERM_PROGRAM").unwrap_or_default().to_ascii_lowercase();
    program.contains("ghostty") || program.contains("kitty") || program.contains("wezterm")
}
