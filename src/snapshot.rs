//! Read-only view of the bodies for remote viewers.
//!
//! One snapshot is one JSON array on one line:
//! `[{"type":"proton","position":[12.5,-3.0,40.25],"radius":9.0}, ...]`

use serde::{Deserialize, Serialize};

use crate::body::{Body, Species};
use crate::error::Result;
use crate::params::Space;

const MIN_DISPLAY_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(rename = "type")]
    pub species: Species,
    pub position: Vec<f64>,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub records: Vec<SnapshotRecord>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl Snapshot {
    pub fn capture(bodies: &[Body], space: Space) -> Self {
        let records = bodies
            .iter()
            .map(|body| {
                let p = body.pos;
                let position = [p.x, p.y, p.z]
                    .into_iter()
                    .take(space.axes())
                    .map(round2)
                    .collect();
                SnapshotRecord {
                    species: body.species(),
                    position,
                    radius: round2(body.radius().max(MIN_DISPLAY_RADIUS)),
                }
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newline-terminated JSON.
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::DVec3;

    #[test]
    fn planar_records_have_two_rounded_components() {
        let bodies = [Body::proton(DVec3::new(1.23456, -7.891, 99.0), DVec3::zero())];
        let snapshot = Snapshot::capture(&bodies, Space::Planar);
        assert_eq!(snapshot.records[0].position, vec![1.23, -7.89]);
    }

    #[test]
    fn wire_format_uses_type_label() {
        let bodies = [
            Body::electron(DVec3::new(1.0, 2.0, 3.0), DVec3::zero()),
            Body::neutron(DVec3::zero(), DVec3::zero()),
        ];
        let line = Snapshot::capture(&bodies, Space::Volumetric).to_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value[0]["type"], "electron");
        assert_eq!(value[0]["position"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(value[0]["radius"], 3.0);
        assert_eq!(value[1]["type"], "neutron");
    }

    #[test]
    fn line_parses_back() {
        let bodies = [Body::custom(DVec3::new(5.0, 5.0, 5.0), DVec3::zero(), 1.0, 19.0)];
        let snapshot = Snapshot::capture(&bodies, Space::Volumetric);
        let parsed = Snapshot::from_line(&snapshot.to_line().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.records[0].species, Species::Generic);
    }
}
