use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::drone::{Drone, DroneConfig};
use super::energy::{plan_mission, EnergyPlan};
use super::mission::{Mission, Point};
use super::sim_error::SimError;

pub const MISSIONS_DIR: &str = "missions";
pub const CONFIGURATIONS_DIR: &str = "configurations";
pub const DRONES_DIR: &str = "drones";

/// Mission file as found on disk. Timing and energy may be left out, in
/// which case the mission is planned from its geometry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MissionFile {
    name: String,
    horizontal_speed: f64,
    altitude: i32,
    end_time: Option<f64>,
    energy_req: Option<f64>,
    points: Vec<PointFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointFile {
    latitude: f64,
    longitude: f64,
    end_time: Option<f64>,
    energy: Option<f64>,
}

/// How much recorded timing a mission file carries.
#[derive(Debug, PartialEq, Eq)]
enum Timing {
    Recorded,
    Missing,
    Partial,
}

impl MissionFile {
    fn timing_fields(&self) -> impl Iterator<Item = bool> + '_ {
        [self.end_time, self.energy_req]
            .into_iter()
            .chain(self.points.iter().flat_map(|p| [p.end_time, p.energy]))
            .map(|field| field.is_some())
    }

    fn timing(&self) -> Timing {
        if self.timing_fields().all(|present| present) {
            Timing::Recorded
        } else if self.timing_fields().any(|present| present) {
            Timing::Partial
        } else {
            Timing::Missing
        }
    }

    fn into_mission(self) -> Mission {
        Mission {
            name: self.name,
            horizontal_speed: self.horizontal_speed,
            altitude: self.altitude,
            end_time: self.end_time.unwrap_or_default(),
            energy_req: self.energy_req.unwrap_or_default(),
            points: self
                .points
                .into_iter()
                .map(|p| Point {
                    latitude: p.latitude,
                    longitude: p.longitude,
                    end_time: p.end_time.unwrap_or_default(),
                    energy: p.energy.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// A mission together with the configuration and drone sharing its key.
#[derive(Debug, Clone)]
pub struct MissionEntry {
    pub key: String,
    pub mission: Mission,
    pub config: DroneConfig,
    pub drone: Drone,
    /// Set when the mission's timing was computed at load time.
    pub plan: Option<EnergyPlan>,
}

/// Everything loaded from a data directory, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct MissionSet {
    pub entries: Vec<MissionEntry>,
}

impl MissionSet {
    /// Loads `<root>/missions`, `<root>/configurations` and `<root>/drones`.
    ///
    /// Files are joined on the part of their stem after the last `-`, so
    /// `mission-2.json`, `config-2.json` and `drone-2.json` belong together.
    pub fn load(root: &Path) -> Result<Self, SimError> {
        let missions: BTreeMap<SortKey, (PathBuf, MissionFile)> =
            read_dir_keyed(&root.join(MISSIONS_DIR))?;
        let mut configs: BTreeMap<SortKey, (PathBuf, DroneConfig)> =
            read_dir_keyed(&root.join(CONFIGURATIONS_DIR))?;
        let mut drones: BTreeMap<SortKey, (PathBuf, Drone)> =
            read_dir_keyed(&root.join(DRONES_DIR))?;

        if missions.len() != configs.len() || missions.len() != drones.len() {
            return Err(SimError::DataIntegrity(format!(
                "found {} missions, {} configurations and {} drones",
                missions.len(),
                configs.len(),
                drones.len()
            )));
        }

        let mut entries = Vec::with_capacity(missions.len());
        for (key, (path, file)) in missions {
            let (_, config) = configs.remove(&key).ok_or_else(|| {
                SimError::DataIntegrity(format!("no configuration for mission key '{}'", key.0))
            })?;
            let (_, drone) = drones.remove(&key).ok_or_else(|| {
                SimError::DataIntegrity(format!("no drone for mission key '{}'", key.0))
            })?;

            let (mission, plan) = match file.timing() {
                Timing::Recorded => (file.into_mission(), None),
                Timing::Missing => {
                    let mut mission = file.into_mission();
                    let plan = plan_mission(&mut mission, &config, &drone)?;
                    (mission, Some(plan))
                }
                Timing::Partial => {
                    return Err(SimError::ParseError {
                        path: path.display().to_string(),
                        reason: "endTime/energy/energyReq are only partially recorded".to_string(),
                    })
                }
            };

            mission.validate().map_err(|e| SimError::ParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

            entries.push(MissionEntry {
                key: key.0,
                mission,
                config,
                drone,
                plan,
            });
        }

        Ok(MissionSet { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Key ordering numeric keys by value and the rest lexically after them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SortKey(String);

impl SortKey {
    fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let key = stem.rsplit('-').next().unwrap_or(stem);
        Some(SortKey(key.to_string()))
    }

    fn rank(&self) -> (Option<u64>, &str) {
        (self.0.parse().ok(), &self.0)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let (a_num, a_str) = self.rank();
        let (b_num, b_str) = other.rank();
        match (a_num, b_num) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| a_str.cmp(b_str)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a_str.cmp(b_str),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn read_dir_keyed<T: DeserializeOwned>(
    dir: &Path,
) -> Result<BTreeMap<SortKey, (PathBuf, T)>, SimError> {
    let mut keyed = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let key = SortKey::from_path(&path).ok_or_else(|| SimError::ParseError {
            path: path.display().to_string(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;

        let value = parse_file(&path)?;
        if let Some((previous, _)) = keyed.insert(key.clone(), (path.clone(), value)) {
            return Err(SimError::DataIntegrity(format!(
                "key '{}' is used by both {} and {}",
                key.0,
                previous.display(),
                path.display()
            )));
        }
    }

    Ok(keyed)
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, SimError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| SimError::ParseError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
