//! The 40 ModelNet40 object categories
//!
//! Labels are indices into [`MODELNET40_CATEGORIES`].

/// Category names in label order
pub const MODELNET40_CATEGORIES: [&str; crate::NUM_CATEGORIES] = [
    "airplane",
    "bathtub",
    "bed",
    "bench",
    "bookshelf",
    "bottle",
    "bowl",
    "car",
    "chair",
    "cone",
    "cup",
    "curtain",
    "desk",
    "door",
    "dresser",
    "flower_pot",
    "glass_box",
    "guitar",
    "keyboard",
    "lamp",
    "laptop",
    "mantel",
    "monitor",
    "night_stand",
    "person",
    "piano",
    "plant",
    "radio",
    "range_hood",
    "sink",
    "sofa",
    "stairs",
    "stool",
    "table",
    "tent",
    "toilet",
    "tv_stand",
    "vase",
    "wardrobe",
    "xbox",
];

/// Look up the category name for a label
pub fn category_name(categories: &[String], label: i64) -> Option<&str> {
    usize::try_from(label)
        .ok()
        .and_then(|idx| categories.get(idx))
        .map(String::as_str)
}

/// Owned copy of the ModelNet40 category list
pub fn modelnet40_categories() -> Vec<String> {
    MODELNET40_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
