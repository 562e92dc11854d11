//! `chatrig start`.

use std::fmt::Write as _;

use anyhow::Result;
use chatrig_core::{Mode, StartReport};

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, mode: Mode) -> Result<()> {
    let report = ctx.controller.start(mode).await.map_err(CliError::from)?;
    print!("{}", render_report(&report, &ctx.settings().webui_url));
    Ok(())
}

/// Human summary of a start, shared with `restart`.
pub fn render_report(report: &StartReport, webui_url: &str) -> String {
    let mut out = String::new();
    let launched = if report.launched.is_empty() {
        "nothing".to_string()
    } else {
        report
            .launched
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let _ = writeln!(out, "Started chatrig ({} mode): {launched}", report.mode);
    let _ = writeln!(
        out,
        "  endpoints: {} (proxy {})",
        report.endpoint_count,
        if report.proxy_enabled { "enabled" } else { "disabled" }
    );

    if let Some(pid) = report.gateway_pid {
        let ready = match report.gateway_ready {
            Some(true) => "ready",
            Some(false) => "not ready yet",
            None => "unchecked",
        };
        let _ = writeln!(out, "  gateway:   pid {pid}, {ready}");
    }

    if let Some(labels) = &report.labels {
        let _ = write!(out, "  labels:    {labels}");
        if let Some(outcome) = report.label_outcome {
            let _ = write!(out, " [{outcome}]");
        }
        if report.frontend_restarted {
            out.push_str(", front-end restarted");
        }
        out.push('\n');
    }

    if report.mode.launches_frontend() {
        let _ = writeln!(out, "  open:      {webui_url}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrig_core::domain::ServiceKind;
    use chatrig_core::{ReconcileOutcome, StepOutcome};

    fn report() -> StartReport {
        StartReport {
            mode: Mode::Full,
            launched: vec![ServiceKind::Gateway, ServiceKind::Frontend, ServiceKind::Proxy],
            proxy_enabled: true,
            endpoint_count: 3,
            gateway_pid: Some(4242),
            gateway_ready: Some(false),
            labels: Some(StepOutcome::Ok),
            label_outcome: Some(ReconcileOutcome::Updated),
            frontend_restarted: true,
        }
    }

    #[test]
    fn full_report_lists_every_step() {
        let text = render_report(&report(), "http://localhost:3000");

        assert!(text.starts_with("Started chatrig (full mode): gateway, front-end, proxy\n"));
        assert!(text.contains("endpoints: 3 (proxy enabled)"));
        assert!(text.contains("pid 4242, not ready yet"));
        assert!(text.contains("labels:    ok [updated], front-end restarted"));
        assert!(text.contains("open:      http://localhost:3000"));
    }

    #[test]
    fn degraded_labels_show_the_reason() {
        let mut r = report();
        r.labels = Some(StepOutcome::Degraded("front-end not running".into()));
        r.label_outcome = None;
        r.frontend_restarted = false;

        let text = render_report(&r, "http://x");
        assert!(text.contains("labels:    degraded (front-end not running)\n"));
    }

    #[test]
    fn gateway_mode_has_no_url_or_labels() {
        let r = StartReport {
            mode: Mode::Gateway,
            launched: vec![ServiceKind::Gateway],
            proxy_enabled: false,
            endpoint_count: 1,
            gateway_pid: None,
            gateway_ready: None,
            labels: None,
            label_outcome: None,
            frontend_restarted: false,
        };

        let text = render_report(&r, "http://x");
        assert!(!text.contains("open:"));
        assert!(!text.contains("labels:"));
        assert!(text.contains("(proxy disabled)"));
    }
}
