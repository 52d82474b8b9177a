//! Class taxonomy for weld defect annotations.

use crate::color::Rgb;

/// Class name used on import when a line's class id is not in the table.
pub const UNKNOWN_CLASS: &str = "unknown";

/// Color used for class names that do not resolve to a definition.
pub const FALLBACK_CLASS_COLOR: Rgb = Rgb::RED;

/// An annotation class with a stable id, display name and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDefinition {
    /// Unique 0-based identifier, written as the first field of an export line.
    pub id: u32,
    /// Unique display label, stored on each annotation.
    pub name: &'static str,
    /// Render color for the class.
    pub color: Rgb,
}

impl ClassDefinition {
    pub const fn new(id: u32, name: &'static str, color: Rgb) -> Self {
        Self { id, name, color }
    }
}

/// The built-in taxonomy, in canonical id order.
pub const DEFAULT_CLASSES: [ClassDefinition; 13] = [
    ClassDefinition::new(0, "пора", Rgb::new(255, 50, 50)),
    ClassDefinition::new(1, "включение", Rgb::new(0, 255, 0)),
    ClassDefinition::new(2, "подрез", Rgb::new(0, 0, 255)),
    ClassDefinition::new(3, "прожог", Rgb::new(255, 255, 0)),
    ClassDefinition::new(4, "трещина", Rgb::new(255, 0, 255)),
    ClassDefinition::new(5, "наплыв", Rgb::new(0, 255, 255)),
    ClassDefinition::new(6, "эталон1", Rgb::new(255, 64, 64)),
    ClassDefinition::new(7, "эталон2", Rgb::new(64, 255, 64)),
    ClassDefinition::new(8, "эталон3", Rgb::new(0, 0, 128)),
    ClassDefinition::new(9, "пора-скрытая", Rgb::new(128, 128, 0)),
    ClassDefinition::new(10, "утяжина", Rgb::new(128, 0, 128)),
    ClassDefinition::new(11, "несплавление", Rgb::new(0, 128, 128)),
    ClassDefinition::new(12, "непровар корня", Rgb::new(192, 192, 192)),
];

/// Lookup table over a fixed set of class definitions.
#[derive(Debug, Clone, Copy)]
pub struct ClassTable {
    classes: &'static [ClassDefinition],
}

impl ClassTable {
    /// The built-in taxonomy.
    pub const fn builtin() -> Self {
        Self {
            classes: &DEFAULT_CLASSES,
        }
    }

    pub fn all(&self) -> &'static [ClassDefinition] {
        self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class new polygons get when nothing else was chosen (lowest id).
    pub fn default_class(&self) -> Option<&'static ClassDefinition> {
        self.classes.iter().min_by_key(|c| c.id)
    }

    pub fn by_id(&self, id: u32) -> Option<&'static ClassDefinition> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&'static ClassDefinition> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// Export id for a class name, falling back to 0 for unknown names.
    pub fn id_or_default(&self, name: &str) -> u32 {
        self.by_name(name).map_or(0, |c| c.id)
    }

    /// Class name for an imported id, or [`UNKNOWN_CLASS`].
    pub fn name_or_unknown(&self, id: u32) -> &'static str {
        self.by_id(id).map_or(UNKNOWN_CLASS, |c| c.name)
    }

    /// Render color for a class name, or [`FALLBACK_CLASS_COLOR`].
    pub fn color_for(&self, name: &str) -> Rgb {
        self.by_name(name).map_or(FALLBACK_CLASS_COLOR, |c| c.color)
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_and_names_are_unique() {
        let table = ClassTable::builtin();
        let ids: HashSet<u32> = table.all().iter().map(|c| c.id).collect();
        let names: HashSet<&str> = table.all().iter().map(|c| c.name).collect();
        assert_eq!(ids.len(), 13);
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn test_builtin_is_in_id_order() {
        for (idx, class) in ClassTable::builtin().all().iter().enumerate() {
            assert_eq!(class.id as usize, idx);
        }
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let table = ClassTable::builtin();
        assert_eq!(table.id_or_default("трещина"), 4);
        assert_eq!(table.name_or_unknown(12), "непровар корня");
        assert_eq!(table.default_class().map(|c| c.name), Some("пора"));
    }

    #[test]
    fn test_unresolved_fallbacks() {
        let table = ClassTable::builtin();
        assert_eq!(table.id_or_default("no such class"), 0);
        assert_eq!(table.name_or_unknown(99), UNKNOWN_CLASS);
        assert_eq!(table.color_for(UNKNOWN_CLASS), FALLBACK_CLASS_COLOR);
        assert_eq!(table.color_for("подрез"), Rgb::new(0, 0, 255));
    }
}
