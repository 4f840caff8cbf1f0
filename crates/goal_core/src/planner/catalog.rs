//! Built-in topic templates.
//!
//! Lookup order is the declaration order of [`CATALOG`]; topic detection
//! walks it front to back and `default` must stay last.

pub const DEFAULT_TOPIC: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Foundation,
    Intermediate,
    Advanced,
    Project,
}

impl Category {
    /// Order in which categories are laid out in a schedule.
    pub const ORDER: [Category; 4] = [
        Category::Foundation,
        Category::Intermediate,
        Category::Advanced,
        Category::Project,
    ];
}

#[derive(Debug, PartialEq, Eq)]
pub struct TopicTemplate {
    pub key: &'static str,
    pub foundation: &'static [&'static str],
    pub intermediate: &'static [&'static str],
    pub advanced: &'static [&'static str],
    pub project: &'static [&'static str],
}

impl TopicTemplate {
    pub fn titles(&self, category: Category) -> &'static [&'static str] {
        match category {
            Category::Foundation => self.foundation,
            Category::Intermediate => self.intermediate,
            Category::Advanced => self.advanced,
            Category::Project => self.project,
        }
    }
}

static REACT: TopicTemplate = TopicTemplate {
    key: "react",
    foundation: &["JSX Syntax", "Components Basics", "Props"],
    intermediate: &[
        "State Management",
        "Hooks (useState, useEffect)",
        "Event Handling",
    ],
    advanced: &["Context API", "Custom Hooks", "Performance Optimization"],
    project: &["Mini Project"],
};

static PYTHON: TopicTemplate = TopicTemplate {
    key: "python",
    foundation: &["Syntax & Variables", "Data Types", "Control Flow"],
    intermediate: &["Functions", "OOP Basics", "File Handling"],
    advanced: &["Decorators", "Generators", "Async Programming"],
    project: &["CLI Application"],
};

static JAVASCRIPT: TopicTemplate = TopicTemplate {
    key: "javascript",
    foundation: &["Variables & Types", "Functions", "Arrays & Objects"],
    intermediate: &["DOM Manipulation", "Async/Await", "Promises"],
    advanced: &["Closures", "Prototypes", "ES6+ Features"],
    project: &["Interactive Web App"],
};

static DATA_STRUCTURES: TopicTemplate = TopicTemplate {
    key: "data_structures",
    foundation: &["Arrays", "Linked Lists", "Stacks & Queues"],
    intermediate: &["Trees", "Hash Tables", "Graphs"],
    advanced: &[
        "Advanced Trees",
        "Dynamic Programming",
        "Algorithm Analysis",
    ],
    project: &["Algorithm Implementation"],
};

static DEFAULT: TopicTemplate = TopicTemplate {
    key: DEFAULT_TOPIC,
    foundation: &[
        "Introduction & Setup",
        "Basic Concepts",
        "Core Fundamentals",
    ],
    intermediate: &[
        "Intermediate Topics",
        "Practical Applications",
        "Best Practices",
    ],
    advanced: &[
        "Advanced Concepts",
        "Optimization Techniques",
        "Real-world Scenarios",
    ],
    project: &["Capstone Project"],
};

pub static CATALOG: [&TopicTemplate; 5] = [&REACT, &PYTHON, &JAVASCRIPT, &DATA_STRUCTURES, &DEFAULT];

/// Returns the template registered under `key`, or the `default` template.
pub fn template(key: &str) -> &'static TopicTemplate {
    CATALOG
        .iter()
        .copied()
        .find(|template| template.key == key)
        .unwrap_or(&DEFAULT)
}
