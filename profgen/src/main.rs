mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use earthmodel::{
    read_ak135_file, read_detox_file, read_iasp91_file, read_mit_file, read_prem_file,
    Extrapolation, PointCloud, ReferenceModel,
};
use log::debug;
use options::{Cli, Command as CliCmd, LatLon};
use serde::Serialize;
use std::io::Write;
use velprof::{
    math::steps, CloudSampler, DepthBounds, Perturbation, Profile, SlownessPolicy, Source,
};

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    env_logger::init();

    let reference = load_reference(&cli)?;
    let cloud = load_cloud(&cli)?;
    let sampler = cloud.as_ref().map(CloudSampler::new);

    let depths: Vec<f64> = steps(cli.top, cli.bottom, cli.step).collect();
    if depths.is_empty() {
        return Err(anyhow!(
            "no depths between {} and {} km at {} km steps",
            cli.top,
            cli.bottom,
            cli.step
        ));
    }

    let LatLon(location) = cli.location;
    let mut builder = Profile::builder()
        .location(location)
        .depths(&depths)
        .reference(&reference)
        .kind(cli.kind)
        .mode(cli.mode);
    if cli.extrapolate {
        builder = builder.extrapolation(Extrapolation::Extrapolate);
    }
    if cli.strict {
        builder = builder.slowness_policy(SlownessPolicy::Strict);
    }
    if let Some(sampler) = &sampler {
        let perturbation = if cli.percent {
            Perturbation::Percent
        } else {
            Perturbation::Fraction
        };
        builder = builder.vp(
            Source::new(sampler)
                .perturbation(perturbation)
                .depth_bounds(DepthBounds::new(cli.min_depth, cli.max_depth)),
        );
    }
    let profile = builder.build()?;

    match cli.cmd {
        CliCmd::Csv => print_csv(&profile)?,
        CliCmd::Json => print_json(&profile)?,
    };
    Ok(())
}

fn load_reference(cli: &Cli) -> Result<ReferenceModel, AnyError> {
    let model = match (&cli.ak135, &cli.prem, &cli.iasp91, &cli.density_prem) {
        (Some(path), _, _, _) => read_ak135_file(path)?,
        (_, Some(path), _, _) => read_prem_file(path)?,
        (_, _, Some(path), Some(density)) => {
            read_iasp91_file(path)?.with_density_from(&read_prem_file(density)?)?
        }
        _ => return Err(anyhow!("no reference model")),
    };
    debug!("reference model with {} rows", model.len());
    Ok(model)
}

fn load_cloud(cli: &Cli) -> Result<Option<PointCloud>, AnyError> {
    let cloud = match (&cli.mit, &cli.detox) {
        (Some(path), _) => read_mit_file(path)?,
        (_, Some(path)) => read_detox_file(path)?.to_geographic(),
        (None, None) => return Ok(None),
    };
    debug!("point cloud with {} points", cloud.len());
    Ok(Some(if cli.unit_sphere {
        cloud.to_unit_sphere()
    } else {
        cloud
    }))
}

/// # Example with gnuplot
///
/// ```sh
/// cargo run -- --ak135=ak135f.csv --location=40,-120 --bottom=700 csv | tr ',' ' ' > ~/.tmp/plot && gnuplot -p -e "plot for [col=3:5] '~/.tmp/plot' using col:1 with lines"
/// ```
fn print_csv(profile: &Profile) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Radius,Depth,Vp,Vs,Rho")?;
    for (radius, [vp, vs, rho]) in profile.radius.iter().zip(&profile.values) {
        let depth = earthmodel::EARTH_RADIUS_KM - radius;
        writeln!(stdout, "{radius},{depth},{vp},{vs},{rho}")?;
    }
    Ok(())
}

fn print_json(profile: &Profile) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        radius: f64,
        vp: f64,
        vs: f64,
        rho: f64,
    }

    let reshaped: Vec<JsonEntry> = profile
        .radius
        .iter()
        .zip(&profile.values)
        .map(|(&radius, &[vp, vs, rho])| JsonEntry {
            radius,
            vp,
            vs,
            rho,
        })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}
