//! `pylaunch check`: preflight report without side effects.

use anyhow::Result;
use pylaunch_core::config::LauncherConfig;
use pylaunch_core::error::EXIT_FAILURE;
use pylaunch_env::activation::Activation;
use pylaunch_env::layout::VenvLayout;
use pylaunch_env::runtime_resolver::resolve_interpreter;
use serde::Serialize;
use std::ffi::OsString;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub root: String,
    pub venv: String,
    pub activation_artifact: String,
    pub artifact_present: bool,
    pub interpreter: Option<String>,
    pub entry: String,
    pub entry_present: bool,
    pub tools: Vec<ToolStatus>,
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<String>,
}

pub fn build_report(cfg: &LauncherConfig) -> CheckReport {
    let layout = VenvLayout::detect(cfg.venv_path());
    let artifact_present = layout.has_activation_artifact();

    // Same PATH the child would see, so tools installed into the venv count.
    let search_path: Option<OsString> = Activation::for_layout(&layout)
        .ok()
        .and_then(|a| a.search_path().map(|p| p.to_os_string()))
        .or_else(|| std::env::var_os("PATH"));

    let interpreter = resolve_interpreter(
        &layout,
        cfg.python.as_deref(),
        search_path.as_deref(),
        &cfg.root,
    )
    .ok()
    .map(|p| p.display().to_string());

    let entry_path = cfg.entry_path();
    let entry_present = entry_path.is_file();

    let tools = cfg
        .required_tools
        .iter()
        .map(|name| ToolStatus {
            name: name.clone(),
            path: which::which_in(name, search_path.as_deref(), &cfg.root)
                .ok()
                .map(|p| p.display().to_string()),
        })
        .collect();

    CheckReport {
        root: cfg.root.display().to_string(),
        venv: layout.root().display().to_string(),
        activation_artifact: layout.activation_artifact().display().to_string(),
        artifact_present,
        ready: artifact_present && interpreter.is_some() && entry_present,
        interpreter,
        entry: entry_path.display().to_string(),
        entry_present,
        tools,
    }
}

pub fn cmd_check(cfg: &LauncherConfig, json: bool) -> Result<i32> {
    let report = build_report(cfg);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &cfg.setup_guide);
    }

    Ok(if report.ready { 0 } else { EXIT_FAILURE })
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn print_report(report: &CheckReport, guide: &str) {
    println!("Project: {}", report.root);
    println!(
        "  {} activation artifact  {}",
        mark(report.artifact_present),
        report.activation_artifact
    );
    println!(
        "  {} interpreter          {}",
        mark(report.interpreter.is_some()),
        report.interpreter.as_deref().unwrap_or("(not found)")
    );
    println!("  {} entry script         {}", mark(report.entry_present), report.entry);
    for tool in &report.tools {
        match tool.path {
            Some(ref p) => println!("  ✓ {:<20} {}", tool.name, p),
            None => println!("  ⚠ {:<20} not on PATH", tool.name),
        }
    }
    println!();
    if report.ready {
        println!("Ready to launch.");
    } else if !report.artifact_present {
        println!("Not ready: follow the setup guide in {} (or run `pylaunch setup`).", guide);
    } else {
        println!("Not ready.");
    }
}
