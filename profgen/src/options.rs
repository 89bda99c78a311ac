use anyhow::{anyhow, Error as AnyError};
use clap::{ArgGroup, Parser, Subcommand};
use earthmodel::InterpKind;
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};
use velprof::Mode;

/// Generate seismic velocity profiles.
#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("reference").required(true).args(["ak135", "prem", "iasp91"])))]
pub struct Cli {
    /// AK135F reference table.
    #[arg(long)]
    pub ak135: Option<PathBuf>,

    /// PREM reference table.
    #[arg(long)]
    pub prem: Option<PathBuf>,

    /// IASP91 reference table; needs `--density-prem`.
    #[arg(long, requires = "density_prem")]
    pub iasp91: Option<PathBuf>,

    /// PREM table supplying density for IASP91.
    #[arg(long)]
    pub density_prem: Option<PathBuf>,

    /// MIT P-wave point cloud.
    #[arg(long, conflicts_with = "detox")]
    pub mit: Option<PathBuf>,

    /// DETOX P-wave point cloud.
    #[arg(long)]
    pub detox: Option<PathBuf>,

    /// Sample the point cloud in unit-sphere coordinates.
    #[arg(long, default_value_t = false)]
    pub unit_sphere: bool,

    /// Shallowest depth (km) the point cloud is trusted at.
    #[arg(long)]
    pub min_depth: Option<f64>,

    /// Deepest depth (km) the point cloud is trusted at.
    #[arg(long)]
    pub max_depth: Option<f64>,

    /// Point cloud values are percent, not fractional, perturbations.
    #[arg(long, default_value_t = false)]
    pub percent: bool,

    /// Profile location "lat,lon".
    #[arg(long)]
    pub location: LatLon,

    /// Shallowest depth (km).
    #[arg(long, default_value_t = 0.0)]
    pub top: f64,

    /// Deepest depth (km).
    #[arg(long)]
    pub bottom: f64,

    /// Depth increment (km).
    #[arg(long, default_value_t = 10.0)]
    pub step: f64,

    /// Reference model interpolation.
    #[arg(long, default_value = "linear")]
    pub kind: InterpKind,

    /// "velocity" or "slowness".
    #[arg(long, default_value = "velocity")]
    pub mode: Mode,

    /// Extend the reference model past its ends instead of clamping.
    #[arg(long, default_value_t = false)]
    pub extrapolate: bool,

    /// Fail on velocities that cannot be inverted instead of reporting
    /// zero slowness.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print profile values to stdout as CSV.
    Csv,

    /// Print profile values to stdout as JSON.
    Json,
}
