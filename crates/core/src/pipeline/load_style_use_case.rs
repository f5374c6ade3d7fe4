use std::collections::HashMap;

use crate::stylization::domain::style_code::StyleCode;
use crate::stylization::domain::style_preset::{find_preset, StyleFamily, StylePreset};
use crate::stylization::infrastructure::style_code_store::StyleCodeTable;

use super::network_factory::NetworkFactory;

type DynError = Box<dyn std::error::Error>;

/// Resolves a style name to its preset and exstyle code.
///
/// Style-code tables are read once per family and kept in `tables`.
pub struct LoadStyleUseCase<'a> {
    factory: &'a dyn NetworkFactory,
    tables: &'a mut HashMap<StyleFamily, StyleCodeTable>,
}

impl<'a> LoadStyleUseCase<'a> {
    pub fn new(
        factory: &'a dyn NetworkFactory,
        tables: &'a mut HashMap<StyleFamily, StyleCodeTable>,
    ) -> Self {
        Self { factory, tables }
    }

    pub fn execute(&mut self, style_name: &str) -> Result<(&'static StylePreset, StyleCode), DynError> {
        let preset = find_preset(style_name)?;
        if !self.tables.contains_key(&preset.family) {
            let table = self.factory.style_codes(preset.family)?;
            log::debug!(
                "Loaded {} {} style codes",
                table.len(),
                preset.family.name()
            );
            self.tables.insert(preset.family, table);
        }
        let table = self
            .tables
            .get(&preset.family)
            .ok_or("style code table missing")?;
        Ok((preset, table.code(preset.style_index)?))
    }
}
