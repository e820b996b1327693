//! Closed status vocabularies and their badge presentation
//!
//! Every enum-valued field the UI colors (task status, priority, project
//! status, employee role and status, announcement category) is a closed enum
//! whose badge mapping is an exhaustive `match`. Adding a variant without a
//! badge fails to compile.

use crate::closed_enum;
use crate::core::field::FieldValue;

/// Common behaviour of the closed enums, implemented by [`closed_enum!`]
pub trait ClosedEnum: Copy + Sized + 'static {
    /// Every variant, in declaration (and sort) order
    const ALL: &'static [Self];

    /// Canonical wire key
    fn key(&self) -> &'static str;

    /// Declaration position, used as the sort key
    fn ordinal(&self) -> u8;

    /// Legacy keys that parse to this variant
    fn aliases(&self) -> &'static [&'static str];

    /// Parse a wire key or one of its aliases, case-insensitively
    fn parse(value: &str) -> Option<Self>;

    /// The value as seen by the filter/sort engine
    fn field_value(&self) -> FieldValue {
        FieldValue::Variant {
            ordinal: self.ordinal(),
            key: self.key(),
            aliases: self.aliases(),
        }
    }
}

/// Badge colors available in the design system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeColor {
    Gray,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
}

impl BadgeColor {
    pub fn hex(&self) -> &'static str {
        match self {
            BadgeColor::Gray => "#6b7280",
            BadgeColor::Blue => "#3b82f6",
            BadgeColor::Green => "#22c55e",
            BadgeColor::Yellow => "#eab308",
            BadgeColor::Orange => "#f97316",
            BadgeColor::Red => "#ef4444",
            BadgeColor::Purple => "#a855f7",
        }
    }
}

/// Icons paired with badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeIcon {
    Circle,
    Clock,
    CheckCircle,
    ArrowDown,
    Minus,
    ArrowUp,
    Lightbulb,
    Play,
    Pause,
    Flag,
    Shield,
    Users,
    User,
    UserX,
    Megaphone,
    Calendar,
    FileText,
    AlertTriangle,
}

impl BadgeIcon {
    /// Single-character stand-in for terminals
    pub fn glyph(&self) -> char {
        match self {
            BadgeIcon::Circle => '○',
            BadgeIcon::Clock => '◔',
            BadgeIcon::CheckCircle => '✓',
            BadgeIcon::ArrowDown => '↓',
            BadgeIcon::Minus => '−',
            BadgeIcon::ArrowUp => '↑',
            BadgeIcon::Lightbulb => '✧',
            BadgeIcon::Play => '▶',
            BadgeIcon::Pause => '‖',
            BadgeIcon::Flag => '⚑',
            BadgeIcon::Shield => '⛨',
            BadgeIcon::Users => '☷',
            BadgeIcon::User => '•',
            BadgeIcon::UserX => '×',
            BadgeIcon::Megaphone => '!',
            BadgeIcon::Calendar => '▦',
            BadgeIcon::FileText => '≡',
            BadgeIcon::AlertTriangle => '▲',
        }
    }
}

/// Presentation of a single enum value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub color: BadgeColor,
    pub icon: BadgeIcon,
}

impl Badge {
    const fn new(label: &'static str, color: BadgeColor, icon: BadgeIcon) -> Self {
        Self { label, color, icon }
    }
}

/// Enums that render as badges
pub trait Badged: ClosedEnum {
    fn badge(&self) -> Badge;
}

closed_enum! {
    /// Task workflow state
    pub enum TaskStatus {
        Todo => "todo" | "pending",
        InProgress => "in_progress" | "in-progress" | "inprogress",
        Done => "done" | "completed",
    }
}

impl TaskStatus {
    /// Next state in the toggle cycle used by the task list
    pub fn next(&self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }
}

impl Badged for TaskStatus {
    fn badge(&self) -> Badge {
        match self {
            TaskStatus::Todo => Badge::new("To do", BadgeColor::Gray, BadgeIcon::Circle),
            TaskStatus::InProgress => Badge::new("In progress", BadgeColor::Blue, BadgeIcon::Clock),
            TaskStatus::Done => Badge::new("Done", BadgeColor::Green, BadgeIcon::CheckCircle),
        }
    }
}

closed_enum! {
    /// Task priority
    pub enum Priority {
        Low => "low",
        Medium => "medium" | "normal",
        High => "high" | "urgent",
    }
}

impl Badged for Priority {
    fn badge(&self) -> Badge {
        match self {
            Priority::Low => Badge::new("Low", BadgeColor::Gray, BadgeIcon::ArrowDown),
            Priority::Medium => Badge::new("Medium", BadgeColor::Yellow, BadgeIcon::Minus),
            Priority::High => Badge::new("High", BadgeColor::Red, BadgeIcon::ArrowUp),
        }
    }
}

closed_enum! {
    /// Project lifecycle state
    pub enum ProjectStatus {
        Planning => "planning" | "not_started",
        Active => "active" | "in_progress" | "ongoing",
        OnHold => "on_hold" | "on-hold" | "paused",
        Completed => "completed" | "done",
    }
}

impl Badged for ProjectStatus {
    fn badge(&self) -> Badge {
        match self {
            ProjectStatus::Planning => Badge::new("Planning", BadgeColor::Purple, BadgeIcon::Lightbulb),
            ProjectStatus::Active => Badge::new("Active", BadgeColor::Blue, BadgeIcon::Play),
            ProjectStatus::OnHold => Badge::new("On hold", BadgeColor::Orange, BadgeIcon::Pause),
            ProjectStatus::Completed => Badge::new("Completed", BadgeColor::Green, BadgeIcon::Flag),
        }
    }
}

closed_enum! {
    /// Employee role within the company
    pub enum EmployeeRole {
        Admin => "admin",
        Manager => "manager",
        Employee => "employee" | "user" | "staff",
    }
}

impl Badged for EmployeeRole {
    fn badge(&self) -> Badge {
        match self {
            EmployeeRole::Admin => Badge::new("Admin", BadgeColor::Red, BadgeIcon::Shield),
            EmployeeRole::Manager => Badge::new("Manager", BadgeColor::Purple, BadgeIcon::Users),
            EmployeeRole::Employee => Badge::new("Employee", BadgeColor::Blue, BadgeIcon::User),
        }
    }
}

closed_enum! {
    /// Whether an employee account is enabled
    pub enum EmployeeStatus {
        Active => "active",
        Inactive => "inactive" | "disabled",
    }
}

impl Badged for EmployeeStatus {
    fn badge(&self) -> Badge {
        match self {
            EmployeeStatus::Active => Badge::new("Active", BadgeColor::Green, BadgeIcon::CheckCircle),
            EmployeeStatus::Inactive => Badge::new("Inactive", BadgeColor::Gray, BadgeIcon::UserX),
        }
    }
}

closed_enum! {
    /// Announcement category
    pub enum AnnouncementCategory {
        General => "general",
        Event => "event" | "events",
        Policy => "policy" | "hr",
        Urgent => "urgent" | "important",
    }
}

impl Badged for AnnouncementCategory {
    fn badge(&self) -> Badge {
        match self {
            AnnouncementCategory::General => Badge::new("General", BadgeColor::Gray, BadgeIcon::Megaphone),
            AnnouncementCategory::Event => Badge::new("Event", BadgeColor::Blue, BadgeIcon::Calendar),
            AnnouncementCategory::Policy => Badge::new("Policy", BadgeColor::Purple, BadgeIcon::FileText),
            AnnouncementCategory::Urgent => Badge::new("Urgent", BadgeColor::Red, BadgeIcon::AlertTriangle),
        }
    }
}
