use std::io::Write;

use anyhow::{Context, Result};
use glitchfx::{StageTrace, Vec2};
use renderer::{RenderPolicy, Renderer, RendererConfig, SceneSettings};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RunArgs, SampleArgs};
use crate::config::{FileConfig, Settings};
use crate::paths::AppPaths;

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();

    match cli.command {
        Some(Command::Sample(args)) => print_sample(args),
        None => run_renderer(&cli.run),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_file_config(args: &RunArgs) -> Result<FileConfig> {
    if let Some(path) = args.config.as_ref() {
        tracing::debug!(path = %path.display(), "loading explicit config file");
        return FileConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let paths = AppPaths::discover()?;
    let path = paths.config_file();
    tracing::debug!(
        config = %paths.config_dir().display(),
        file = %path.display(),
        "resolved glitchsphere paths"
    );
    FileConfig::load_optional(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn build_renderer_config(args: &RunArgs, settings: Settings) -> RendererConfig {
    let policy = match args.still_export.as_ref() {
        Some(path) => RenderPolicy::Export {
            time: args.still_time.unwrap_or(0.0),
            path: path.clone(),
        },
        None => RenderPolicy::Animate {
            target_fps: settings.target_fps,
        },
    };

    RendererConfig {
        surface_size: settings.surface_size,
        time_step: settings.time_step,
        antialiasing: settings.antialiasing,
        color_space: settings.color_space,
        scene: SceneSettings::default(),
        policy,
    }
}

fn run_renderer(args: &RunArgs) -> Result<()> {
    let file = load_file_config(args)?;
    let settings = Settings::resolve(&file, args).context("invalid settings")?;
    let config = build_renderer_config(args, settings);

    match &config.policy {
        RenderPolicy::Animate { target_fps } => tracing::info!(
            width = config.surface_size.0,
            height = config.surface_size.1,
            fps = ?target_fps,
            time_step = config.time_step,
            "starting glitch sphere"
        ),
        RenderPolicy::Export { time, path } => tracing::info!(
            path = %path.display(),
            time,
            width = config.surface_size.0,
            height = config.surface_size.1,
            "rendering still frame"
        ),
    }

    let mut renderer = Renderer::new(config);
    renderer.run()
}

fn print_sample(args: SampleArgs) -> Result<()> {
    let trace = glitchfx::shade_stages(Vec2::new(args.u, args.v), args.time);
    let mut stdout = std::io::stdout().lock();
    write_trace(&mut stdout, &trace).context("failed to write sample trace")
}

fn write_trace(out: &mut impl Write, trace: &StageTrace) -> std::io::Result<()> {
    writeln!(out, "uv          {:.6} {:.6}", trace.uv.x, trace.uv.y)?;
    writeln!(out, "time        {:.6}", trace.time)?;
    writeln!(out, "gate        {:.6}", trace.gate)?;
    writeln!(out, "glitching   {}", trace.glitching)?;
    writeln!(
        out,
        "distorted   {:.6} {:.6}",
        trace.distorted.x, trace.distorted.y
    )?;
    writeln!(out, "pulse       {:.6}", trace.pulse)?;
    writeln!(out, "grid        {:.6}", trace.grid)?;
    writeln!(out, "grain       {:.6}", trace.grain)?;
    writeln!(out, "halftone    {:.6}", trace.halftone)?;
    writeln!(out, "gradient    {:.6}", trace.gradient)?;
    writeln!(out, "color_shift {:.6}", trace.color_shift)?;
    let base = trace.base_color;
    writeln!(
        out,
        "base_color  {:.6} {:.6} {:.6}",
        base.r(),
        base.g(),
        base.b()
    )?;
    let color = trace.color;
    writeln!(
        out,
        "color       {:.6} {:.6} {:.6}",
        color.r(),
        color.g(),
        color.b()
    )?;
    let [r, g, b, _] = color.to_rgba8();
    writeln!(out, "rgb8        {r} {g} {b}")
}
