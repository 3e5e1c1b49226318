//! On-disk JSON shape of band plans and the colour table.

use super::{Allocation, BandPlan, Raster};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterDescriptor {
    pub width: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub step: f64,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandPlanDescriptor {
    pub name: String,
    pub country_name: String,
    pub country_code: String,
    pub author_name: String,
    pub author_url: String,
    pub bands: Vec<AllocationDescriptor>,
}

/// `config.json` sibling of the plan files. Only the colour table is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorTableDescriptor {
    #[serde(rename = "bandColors", default)]
    pub band_colors: BTreeMap<String, String>,
}

impl AllocationDescriptor {
    fn validate(&self) -> Result<Allocation> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start >= self.end {
            bail!(
                "allocation '{}' has an invalid range [{}, {})",
                self.name,
                self.start,
                self.end
            );
        }

        let raster = match &self.raster {
            Some(raster) if !(raster.width > 0.0) => {
                bail!("allocation '{}' has a non-positive raster width", self.name)
            }
            Some(raster) if !(raster.step >= 0.0) => {
                bail!("allocation '{}' has a negative raster step", self.name)
            }
            Some(raster) => Some(Raster {
                width: raster.width,
                step: raster.step,
            }),
            None => None,
        };

        Ok(Allocation {
            name: self.name.clone(),
            kind: self.kind.clone(),
            start: self.start,
            end: self.end,
            raster,
        })
    }
}

impl BandPlanDescriptor {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("malformed band plan descriptor")
    }

    pub fn into_plan(self) -> Result<BandPlan> {
        let allocations = self
            .bands
            .iter()
            .map(AllocationDescriptor::validate)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("band plan '{}' rejected", self.name))?;

        let mut plan = BandPlan::new(self.name, allocations);
        plan.country_name = self.country_name;
        plan.country_code = self.country_code;
        plan.author_name = self.author_name;
        plan.author_url = self.author_url;
        Ok(plan)
    }

    pub fn from_plan(plan: &BandPlan) -> Self {
        Self {
            name: plan.name.clone(),
            country_name: plan.country_name.clone(),
            country_code: plan.country_code.clone(),
            author_name: plan.author_name.clone(),
            author_url: plan.author_url.clone(),
            bands: plan
                .allocations
                .iter()
                .map(|allocation| AllocationDescriptor {
                    name: allocation.name.clone(),
                    kind: allocation.kind.clone(),
                    start: allocation.start,
                    end: allocation.end,
                    raster: allocation.raster.map(|raster| RasterDescriptor {
                        width: raster.width,
                        step: raster.step,
                    }),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r##"{
        "name": "Test Plan",
        "country_name": "Nowhere",
        "country_code": "NW",
        "author_name": "someone",
        "author_url": "https://example.invalid",
        "bands": [
            { "name": "80m", "type": "amateur", "start": 3500000, "end": 3800000 },
            { "name": "PMR", "type": "pmr", "start": 446000000, "end": 446200000,
              "raster": { "width": 12500, "step": 25000 } },
            { "name": "comb", "type": "pmr", "start": 1000, "end": 2000,
              "raster": { "width": 100 } }
        ]
    }"##;

    #[test]
    fn parses_full_plan() {
        let plan = BandPlanDescriptor::parse(PLAN).unwrap().into_plan().unwrap();
        assert_eq!(plan.name, "Test Plan");
        assert_eq!(plan.country_code, "NW");
        assert_eq!(plan.allocations.len(), 3);
        assert_eq!(plan.allocations[0].kind, "amateur");
        assert_eq!(
            plan.allocations[1].raster,
            Some(Raster {
                width: 12500.0,
                step: 25000.0
            })
        );
        assert_eq!(plan.allocations[2].raster.unwrap().step, 0.0);
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{ "name": "x", "country_name": "", "country_code": "",
                        "author_name": "", "bands": [] }"#;
        let err = BandPlanDescriptor::parse(json).unwrap_err();
        assert!(format!("{err:#}").contains("author_url"));
    }

    #[test]
    fn inverted_range_rejects_plan() {
        let json = r#"{ "name": "x", "country_name": "", "country_code": "",
                        "author_name": "", "author_url": "",
                        "bands": [ { "name": "bad", "type": "t", "start": 5, "end": 1 } ] }"#;
        let err = BandPlanDescriptor::parse(json)
            .unwrap()
            .into_plan()
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid range"));
    }

    #[test]
    fn descriptor_survives_plan_conversion() {
        let plan = BandPlanDescriptor::parse(PLAN).unwrap().into_plan().unwrap();
        let json = serde_json::to_string(&BandPlanDescriptor::from_plan(&plan)).unwrap();
        assert!(json.contains("\"type\":\"pmr\""));
        assert!(!json.contains("\"step\":0"));
    }

    #[test]
    fn color_table_reads_band_colors_key() {
        let table: ColorTableDescriptor =
            serde_json::from_str(r##"{ "bandColors": { "amateur": "#FF000080" }, "other": 1 }"##)
                .unwrap();
        assert_eq!(table.band_colors["amateur"], "#FF000080");
    }
}
