//! Scanner for the sediment configuration text format.
//!
//! The format is a sequence of groups, one per grain type.  A group is
//! introduced by a header line beginning with `---` carrying the quoted
//! group name, followed by `key: value` lines:
//!
//! ```text
//! --- 'Grain 1 (bedload)' ---
//! grain size (microns):       200
//! grain density (kg/m^3):     2625
//! ...
//! ```
//!
//! Keys are case-insensitive, surrounding whitespace is trimmed and a
//! parenthesized unit hint after the key name is ignored.  Group order
//! defines catalog index order; the first group is bedload.

use indexmap::IndexMap;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Result, SedimentError};
use crate::grain::GrainType;
use strata_core::constants;

const KEY_GRAIN_SIZE: &str = "grain size";
const KEY_RHO_GRAIN: &str = "grain density";
const KEY_RHO_SAT: &str = "saturated density";
const KEY_VOID_MIN: &str = "minimum void ratio";
const KEY_PLASTIC_INDEX: &str = "plastic index";
const KEY_DIFF_COEF: &str = "diffusion coefficient";
const KEY_LAMBDA: &str = "removal rate";
const KEY_C_V: &str = "consolidation coefficient";
const KEY_C: &str = "compaction coefficient";

/// The compiled-in five-grain default catalog, coarsest (bedload) first.
pub const DEFAULT_CATALOG: &str = "\
--- 'Grain 1 (bedload)' ---
grain size (microns):       200
grain density (kg/m^3):     2625
saturated density (kg/m^3): 1850
minimum void ratio (-):     .30
plastic index (-):          .1
diffusion coefficient (-):  .25
removal rate (1/day):       50
consolidation coefficient (m^2/yr): 100000
compaction coefficient (-): 0.0000000368
--- 'Grain 2' ---
grain size (microns):       100
grain density (kg/m^3):     2600
saturated density (kg/m^3): 1800
minimum void ratio (-):     .2
plastic index (-):          .2
diffusion coefficient (-):  .25
removal rate (1/day):       16.8
consolidation coefficient (m^2/yr): 10000
compaction coefficient (-): 0.00000005
--- 'Grain 3' ---
grain size (microns):       40
grain density (kg/m^3):     2550
saturated density (kg/m^3): 1750
minimum void ratio (-):     .15
plastic index (-):          .3
diffusion coefficient (-):  .5
removal rate (1/day):       9
consolidation coefficient (m^2/yr): 1000
compaction coefficient (-): 0.00000007
--- 'Grain 4' ---
grain size (microns):       10
grain density (kg/m^3):     2500
saturated density (kg/m^3): 1700
minimum void ratio (-):     .1
plastic index (-):          .4
diffusion coefficient (-):  .75
removal rate (1/day):       3.2
consolidation coefficient (m^2/yr): 100
compaction coefficient (-): 0.00000008
--- 'Grain 5' ---
grain size (microns):       1
grain density (kg/m^3):     2450
saturated density (kg/m^3): 1650
minimum void ratio (-):     .05
plastic index (-):          .5
diffusion coefficient (-):  1.
removal rate (1/day):       2.4
consolidation coefficient (m^2/yr): 10
compaction coefficient (-): 0.000000368
";

/// One scanned group: its quoted name and the ordered key/value table.
#[derive(Debug)]
struct Group {
    name: String,
    entries: IndexMap<String, String>,
}

impl Group {
    fn value(&self, key: &'static str) -> Result<f64> {
        let raw = self
            .entries
            .get(key)
            .ok_or_else(|| SedimentError::MissingKey {
                group: self.name.clone(),
                key,
            })?;

        raw.parse().map_err(|_| SedimentError::InvalidValue {
            group: self.name.clone(),
            key,
            value: raw.clone(),
        })
    }
}

impl Catalog {
    /// Scan a catalog from configuration text.
    pub fn scan_text(text: &str) -> Result<Catalog> {
        let groups = split_groups(text)?;

        if groups.is_empty() {
            return Err(SedimentError::EmptyCatalog);
        }

        let mut cat = Catalog::new();
        for group in &groups {
            let t = grain_type_from_group(group)?;
            cat.add(t);
        }

        debug!(
            n_groups = groups.len(),
            n_types = cat.len(),
            "scanned sediment catalog"
        );

        Ok(cat)
    }

    /// Scan a catalog from a configuration file.
    pub fn scan_file(path: impl AsRef<std::path::Path>) -> Result<Catalog> {
        let text = std::fs::read_to_string(path)?;
        Catalog::scan_text(&text)
    }

    /// The compiled-in default catalog.
    pub fn default_catalog() -> Catalog {
        Catalog::scan_text(DEFAULT_CATALOG).expect("default catalog text is well formed")
    }
}

/// Split configuration text into named groups of key/value entries.
fn split_groups(text: &str) -> Result<Vec<Group>> {
    let mut groups: Vec<Group> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("---") {
            groups.push(Group {
                name: header_name(line)?,
                entries: IndexMap::new(),
            });
            continue;
        }

        let group = groups
            .last_mut()
            .ok_or_else(|| SedimentError::MalformedHeader(line.to_string()))?;

        if let Some((key, value)) = line.split_once(':') {
            group
                .entries
                .insert(canonical_key(key), value.trim().to_string());
        }
    }

    Ok(groups)
}

/// Extract the quoted name from a `--- 'name' ---` header line.
fn header_name(line: &str) -> Result<String> {
    let open = line.find('\'');
    let close = line.rfind('\'');

    match (open, close) {
        (Some(a), Some(b)) if b > a => Ok(line[a + 1..b].to_string()),
        _ => Err(SedimentError::MalformedHeader(line.to_string())),
    }
}

/// Lower-case a key and strip any parenthesized unit hint.
fn canonical_key(key: &str) -> String {
    let key = match key.find('(') {
        Some(i) => &key[..i],
        None => key,
    };
    key.trim().to_lowercase()
}

fn grain_type_from_group(group: &Group) -> Result<GrainType> {
    let mut t = GrainType::new();
    t.set_grain_size(group.value(KEY_GRAIN_SIZE)?)
        .set_rho_grain(group.value(KEY_RHO_GRAIN)?)
        .set_rho_sat(group.value(KEY_RHO_SAT)?)
        .set_void_ratio_min(group.value(KEY_VOID_MIN)?)
        .set_plastic_index(group.value(KEY_PLASTIC_INDEX)?)
        .set_diff_coef(group.value(KEY_DIFF_COEF)?)
        .set_lambda(group.value(KEY_LAMBDA)?)
        .set_c_consolidation(group.value(KEY_C_V)?)
        .set_compressibility(group.value(KEY_C)?);

    validate(group, &t)?;

    Ok(t)
}

/// Enforce the physical bounds on a scanned grain type.
fn validate(group: &Group, t: &GrainType) -> Result<()> {
    let rho_min = constants::rho_sea_water();
    let rho_max = constants::rho_quartz();

    let bounded = |what: &'static str, value: f64, min: f64, max: f64| -> Result<()> {
        if value < min || value > max {
            Err(SedimentError::OutOfRange {
                group: group.name.clone(),
                what,
                value,
                min,
                max,
            })
        } else {
            Ok(())
        }
    };

    bounded("grain density", t.rho_grain(), rho_min, rho_max)?;
    bounded("saturated density", t.rho_sat(), rho_min, rho_max)?;
    bounded("saturated density", t.rho_sat(), rho_min, t.rho_grain())?;
    bounded("minimum void ratio", t.void_ratio_min(), 0.0, f64::MAX)?;
    bounded("diffusion coefficient", t.diff_coef(), 0.0, 1.0)?;

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
