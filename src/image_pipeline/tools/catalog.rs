//! Static registry of the image tools built on this pipeline

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    Accessibility,
    Design,
    Photo,
}

impl ToolCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCategory::Accessibility => "Accessibility",
            ToolCategory::Design => "Design",
            ToolCategory::Photo => "Photo",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// URL-safe slug
    pub id: &'static str,
    pub name: &'static str,
    pub category: ToolCategory,
    pub summary: &'static str,
}

static TOOLS: [ToolDescriptor; 3] = [
    ToolDescriptor {
        id: "color-blindness-simulator",
        name: "Color Blindness Simulator",
        category: ToolCategory::Accessibility,
        summary: "Preview an image as seen with eight kinds of colour vision deficiency.",
    },
    ToolDescriptor {
        id: "image-color-extractor",
        name: "Image Color Extractor",
        category: ToolCategory::Design,
        summary: "List the most frequent colours of an image as hex codes.",
    },
    ToolDescriptor {
        id: "image-enhancer",
        name: "Image Enhancer",
        category: ToolCategory::Photo,
        summary: "Tune brightness, contrast, grayscale and blur with a live preview.",
    },
];

/// Every registered tool, in display order.
pub fn all_tools() -> &'static [ToolDescriptor] {
    &TOOLS
}

pub fn find_tool(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.id == id)
}

pub fn tools_in(category: ToolCategory) -> impl Iterator<Item = &'static ToolDescriptor> {
    TOOLS.iter().filter(move |tool| tool.category == category)
}
