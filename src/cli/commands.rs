//! CLI command definitions.

use clap::{Args, Subcommand, ValueEnum};

use crate::model::{Gender, StudentForm};
use crate::view::{QueryState, SortDir, SortKey};

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments. Query flags are remembered between runs.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Case-insensitive match against name or class
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show this class ("All" for every class)
    #[arg(long)]
    pub class: Option<String>,

    /// Sort column; picking the current column again flips direction
    #[arg(long, value_enum)]
    pub sort: Option<SortKeyArg>,

    /// Sort descending
    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    /// Sort ascending
    #[arg(long)]
    pub asc: bool,

    /// Reset search and class filter before applying other flags
    #[arg(long)]
    pub clear: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ListCommand {
    /// Apply the flags to a remembered query state.
    pub fn apply(&self, query: &mut QueryState) {
        if self.clear {
            query.clear();
        }
        if let Some(search) = &self.search {
            query.set_search(search.clone());
        }
        if let Some(class) = &self.class {
            query.set_filter_class(class.clone());
        }
        let explicit_dir = if self.desc {
            Some(SortDir::Desc)
        } else if self.asc {
            Some(SortDir::Asc)
        } else {
            None
        };
        match (self.sort, explicit_dir) {
            (Some(key), Some(dir)) => {
                query.sort_by = key.into();
                query.sort_dir = dir;
            }
            (Some(key), None) => query.toggle_sort(key.into()),
            (None, Some(dir)) => query.sort_dir = dir,
            (None, None) => {}
        }
    }

    /// True when running this command changes the stored query.
    pub fn touches_query(&self) -> bool {
        self.clear
            || self.search.is_some()
            || self.class.is_some()
            || self.sort.is_some()
            || self.desc
            || self.asc
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Student id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Fields for a new student.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Full name (at least two characters)
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub age: String,

    /// Class label, e.g. "5"
    #[arg(long)]
    pub class: String,

    /// Marks from 0 to 100
    #[arg(short, long)]
    pub marks: String,

    #[arg(short, long, value_enum, default_value = "male")]
    pub gender: GenderArg,
}

impl AddCommand {
    pub fn to_form(&self) -> StudentForm {
        StudentForm {
            name: self.name.clone(),
            age: self.age.clone(),
            class_name: self.class.clone(),
            marks: self.marks.clone(),
            gender: self.gender.into(),
        }
    }
}

/// Update command arguments. Omitted fields keep their stored value.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Student id
    pub id: String,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub age: Option<String>,

    #[arg(long)]
    pub class: Option<String>,

    #[arg(short, long)]
    pub marks: Option<String>,

    #[arg(short, long, value_enum)]
    pub gender: Option<GenderArg>,
}

impl UpdateCommand {
    /// Overlay the given flags on a form prefilled from the stored record.
    pub fn apply(&self, form: &mut StudentForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(age) = &self.age {
            form.age = age.clone();
        }
        if let Some(class) = &self.class {
            form.class_name = class.clone();
        }
        if let Some(marks) = &self.marks {
            form.marks = marks.clone();
        }
        if let Some(gender) = self.gender {
            form.gender = gender.into();
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Student id
    pub id: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    Name,
    Class,
    Marks,
    Age,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Name => Self::Name,
            SortKeyArg::Class => Self::Class,
            SortKeyArg::Marks => Self::Marks,
            SortKeyArg::Age => Self::Age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
            GenderArg::Other => Self::Other,
        }
    }
}
