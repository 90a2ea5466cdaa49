use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};

use skygrid::geom::sphere::{radec_to_xyz, xyz_to_radec};
use skygrid::{ConvexRegion, GeodesicGrid, GridConfig, HalfSpace, SearchResult};

#[derive(Parser)]
#[command(name = "skygrid", about = "Geodesic sky grid: zone lookup and region search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print zone and triangle counts per level.
    Info {
        /// Deepest grid level.
        #[arg(long, default_value = "7")]
        max_level: u8,
    },

    /// Find the zone containing a sky position.
    Locate {
        /// Right ascension in degrees.
        #[arg(long)]
        ra: f64,

        /// Declination in degrees.
        #[arg(long)]
        dec: f64,

        /// Level of the zone to report.
        #[arg(long, default_value = "7")]
        level: u8,
    },

    /// List the zones covered by a convex region.
    Query {
        /// Hemisphere centred on "RA,DEC" (degrees). Can be repeated.
        #[arg(long)]
        cap: Vec<String>,

        /// Polygon vertex "RA,DEC" (degrees), counter-clockwise. Repeat for
        /// each vertex (at least 3).
        #[arg(long)]
        polygon: Vec<String>,

        /// Maximum search depth.
        #[arg(long, default_value = "7")]
        level: u8,

        /// Level to express inside zones at (defaults to --level).
        #[arg(long)]
        visit_level: Option<u8>,

        /// Print zone ids, not just counts.
        #[arg(long)]
        list: bool,
    },
}

fn parse_radec(s: &str, what: &str) -> (f64, f64) {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        eprintln!("{what} must be two comma-separated values in degrees (e.g. \"83.6,22.0\")");
        process::exit(1);
    }
    let ra: f64 = parts[0].trim().parse().unwrap_or_else(|_| {
        eprintln!("Invalid {what} RA: {}", parts[0]);
        process::exit(1);
    });
    let dec: f64 = parts[1].trim().parse().unwrap_or_else(|_| {
        eprintln!("Invalid {what} Dec: {}", parts[1]);
        process::exit(1);
    });
    (ra.to_radians(), dec.to_radians())
}

fn format_radec(v: [f64; 3]) -> String {
    let (ra, dec) = xyz_to_radec(v);
    format!("({:.4}, {:+.4})", ra.to_degrees(), dec.to_degrees())
}

fn cmd_info(max_level: u8) {
    let start = Instant::now();
    let grid = GeodesicGrid::<f64>::build(max_level);
    eprintln!(
        "Built grid to level {} in {:.1?}",
        grid.max_level(),
        start.elapsed()
    );

    println!("level       zones   stored triangles");
    let mut stored = 0usize;
    for level in 0..=grid.max_level() {
        let zones = GeodesicGrid::<f64>::nr_of_zones(level);
        if level < grid.max_level() {
            stored += zones;
        }
        println!("{level:>5} {zones:>11} {stored:>18}");
    }
    println!("total stored: {}", grid.triangle_count());
}

fn cmd_locate(ra: f64, dec: f64, config: &GridConfig) {
    let grid = config.build_grid::<f64>();
    let level = config.max_search_level.min(grid.max_level());
    let point = radec_to_xyz(ra.to_radians(), dec.to_radians());

    let zone = grid.zone_containing(point, level).unwrap_or_else(|e| {
        eprintln!("Lookup failed: {e}");
        process::exit(1);
    });
    let corners = grid.triangle_corners(level, zone).unwrap_or_else(|e| {
        eprintln!("Corner lookup failed: {e}");
        process::exit(1);
    });

    println!("Zone {zone} at level {level}");
    for (i, c) in corners.iter().enumerate() {
        println!("  corner {i}: {}", format_radec(*c));
    }
    if let Ok(center) = grid.zone_center(level, zone) {
        println!("  center:   {}", format_radec(center));
    }
    if let Ok(partner) = grid.partner_triangle(level, zone) {
        println!("  partner:  {partner}");
    }
}

fn build_region(caps: &[String], polygon: &[String]) -> ConvexRegion {
    let mut region = if polygon.is_empty() {
        ConvexRegion::whole_sphere()
    } else {
        let vertices: Vec<[f64; 3]> = polygon
            .iter()
            .map(|s| {
                let (ra, dec) = parse_radec(s, "polygon vertex");
                radec_to_xyz(ra, dec)
            })
            .collect();
        ConvexRegion::from_polygon(&vertices).unwrap_or_else(|e| {
            eprintln!("Invalid polygon: {e}");
            process::exit(1);
        })
    };
    for s in caps {
        let (ra, dec) = parse_radec(s, "cap");
        region = region.with(HalfSpace::towards(ra, dec));
    }
    region
}

fn print_result(result: &SearchResult, level: u8, visit_level: u8, list: bool) {
    println!("level   inside   border");
    for l in 0..=level {
        println!(
            "{l:>5} {:>8} {:>8}",
            result.inside_zones_at(l).len(),
            result.border_zones_at(l).len()
        );
    }

    let inside = result.iterate_inside(visit_level);
    println!(
        "{} inside zones at level {}",
        inside.len(),
        inside.visit_level()
    );

    if list {
        let ids: Vec<String> = inside.map(|id| id.to_string()).collect();
        println!("inside: {}", ids.join(" "));
        let border: Vec<String> = result
            .border_iter(level)
            .map(|id| id.to_string())
            .collect();
        println!("border: {}", border.join(" "));
    }
}

fn cmd_query(region: &ConvexRegion, config: &GridConfig, visit_level: Option<u8>, list: bool) {
    let mut searcher = config.searcher::<f64>();
    let level = config.search_level();
    log::info!(
        "searching {} half-space(s) to level {level}",
        region.len()
    );

    let start = Instant::now();
    let result = searcher.query(region, level);
    eprintln!(
        "Search: {} inside, {} border in {:.1?}",
        result.inside_count(),
        result.border_count(),
        start.elapsed()
    );
    print_result(result, level, visit_level.unwrap_or(level), list);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Info { max_level } => cmd_info(*max_level),
        Commands::Locate { ra, dec, level } => {
            let config = GridConfig {
                max_level: *level,
                max_search_level: *level,
            };
            cmd_locate(*ra, *dec, &config);
        }
        Commands::Query {
            cap,
            polygon,
            level,
            visit_level,
            list,
        } => {
            let region = build_region(cap, polygon);
            let config = GridConfig {
                max_level: *level,
                max_search_level: *level,
            };
            cmd_query(&region, &config, *visit_level, *list);
        }
    }
}
