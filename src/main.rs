use clap::Parser;
use panel_cutlist::config::{CostRates, DEFAULT_KERF, OptimizerConfig};
use panel_cutlist::cutlist::{derive_cut_sequence, format_cut_list};
use panel_cutlist::error::{Error, Result};
use panel_cutlist::project::{self, PieceRequest};
use panel_cutlist::render;
use panel_cutlist::solver::Solver;
use panel_cutlist::summary::{
    CostSummary, MIN_OFFCUT_SIZE, format_piece_summary, offcut_summary, piece_summary,
};
use panel_cutlist::types::{Piece, Rect, Rotation};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "panel_cutlist",
    about = "Guillotine panel cutting optimizer with saw cut lists"
)]
struct Cli {
    /// Panel dimensions (WxH, e.g. 244x183)
    #[arg(long, default_value = "244x183", value_parser = parse_dimensions)]
    panel: Rect,

    /// Pieces as WxH:qty[:rotation] (rotation: none, allowed, forced)
    #[arg(long = "pieces", num_args = 1..)]
    pieces: Vec<String>,

    /// Load pieces from a saved project file
    #[arg(long)]
    project: Option<String>,

    /// Save the full piece list to a project file
    #[arg(long)]
    export: Option<String>,

    /// Saw kerf width
    #[arg(long, default_value_t = DEFAULT_KERF)]
    kerf: f64,

    /// Show ASCII layout of each panel
    #[arg(long)]
    layout: bool,

    /// Show rip/cross cut instructions for each panel
    #[arg(long)]
    cut_list: bool,

    /// Price of one panel
    #[arg(long, default_value_t = 0.0)]
    panel_cost: f64,

    /// Price of edge banding per metre
    #[arg(long, default_value_t = 0.0)]
    banding_cost: f64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_dimensions(s: &str) -> std::result::Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(Rect::new(width, height))
}

fn parse_piece(s: &str) -> Result<PieceRequest> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(Error::InvalidDimensions(format!(
            "invalid piece '{}', expected WxH:qty[:rotation]",
            s
        )));
    }
    let rect = parse_dimensions(parts[0]).map_err(Error::InvalidDimensions)?;
    let quantity = parts[1]
        .parse::<u32>()
        .map_err(|_| Error::InvalidDimensions(format!("invalid quantity in '{}'", s)))?;
    if quantity == 0 {
        return Err(Error::InvalidDimensions(format!(
            "quantity must be non-zero in '{}'",
            s
        )));
    }
    let rotation = match parts.get(2) {
        Some(r) => r.parse::<Rotation>().map_err(Error::InvalidDimensions)?,
        None => Rotation::Allowed,
    };
    Ok(PieceRequest {
        rotation,
        ..PieceRequest::new(rect.w, rect.h, quantity)
    })
}

fn collect_pieces(cli: &Cli) -> Result<Vec<Piece>> {
    let mut pieces = match &cli.project {
        Some(path) => project::read_project(path)?,
        None => Vec::new(),
    };
    for arg in &cli.pieces {
        pieces.extend(parse_piece(arg)?.expand());
    }
    Ok(pieces)
}

fn run(cli: &Cli) -> Result<()> {
    let pieces = collect_pieces(cli)?;
    if let Some(path) = &cli.export {
        project::write_project(path, &pieces)?;
        tracing::info!(path = %path, pieces = pieces.len(), "project exported");
    }

    let config = OptimizerConfig::new(cli.panel.w, cli.panel.h, cli.kerf);
    let solution = Solver::new(config, pieces).solve()?;

    for (i, panel) in solution.panels.iter().enumerate() {
        println!("Panel {} ({:.2}% used):", i + 1, panel.efficiency());
        for p in &panel.pieces {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} @ ({}, {}){}", p.rect(), p.x, p.y, rot);
        }
        for o in &panel.offcuts {
            println!("  offcut {}x{} @ ({}, {})", o.width, o.height, o.x, o.y);
        }
        if cli.layout {
            print!("{}", render::render_panel(panel));
        }
        if cli.cut_list {
            print!("{}", format_cut_list(&derive_cut_sequence(panel)));
        }
        println!();
    }

    let groups = piece_summary(&solution.panels);
    if !groups.is_empty() {
        println!("Pieces:");
        print!("{}", format_piece_summary(&groups));
    }

    let remnants = offcut_summary(&solution.panels, MIN_OFFCUT_SIZE);
    if !remnants.is_empty() {
        println!("Offcuts:");
        for group in &remnants {
            println!("  {:.1} x {:.1} (x{})", group.width, group.height, group.quantity);
        }
    }

    println!(
        "Summary: {} panel{} used, {:.1}% waste",
        solution.panel_count(),
        if solution.panel_count() == 1 { "" } else { "s" },
        solution.total_waste_percent(),
    );

    let rates = CostRates {
        panel_cost: cli.panel_cost,
        banding_cost_per_m: cli.banding_cost,
    };
    if rates.panel_cost > 0.0 || rates.banding_cost_per_m > 0.0 {
        let cost = CostSummary::compute(&solution, &rates);
        println!(
            "Cost: panels {:.2} + banding {:.2}m = {:.2}, total {:.2}",
            cost.panel_cost, cost.banding_length_m, cost.banding_cost, cost.total_cost
        );
    }

    if !solution.is_complete() {
        eprintln!(
            "Warning: {} piece{} could not be placed: {}",
            solution.unplaced.len(),
            if solution.unplaced.len() == 1 { "" } else { "s" },
            solution
                .unplaced
                .iter()
                .map(|p| format!("{}x{}", p.width, p.height))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
