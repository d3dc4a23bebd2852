//! Entry module - records extracted from a single line of text

/// Kind of entity an extracted entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An animal needing help (rescue, adoption, treatment)
    Animal,

    /// A non-governmental organisation working with animals
    Ngo,
}

impl EntityKind {
    /// Get the kind name as used in model responses
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Animal => "animal",
            EntityKind::Ngo => "ngo",
        }
    }

    /// Upper-case label used in entry headers
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Animal => "ANIMAL",
            EntityKind::Ngo => "NGO",
        }
    }

    /// Recognised field names, in output order
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Animal => &["type", "age", "location", "contact", "drive_link"],
            EntityKind::Ngo => &["name", "location", "type", "contact"],
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields extracted for an animal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalRecord {
    /// Species or breed ("dog", "tabby cat")
    pub kind: Option<String>,
    /// Age as written in the source ("2 years", "puppy")
    pub age: Option<String>,
    /// Where the animal is
    pub location: Option<String>,
    /// Phone number, e-mail or name to contact
    pub contact: Option<String>,
    /// Link to photos or documents
    pub drive_link: Option<String>,
}

/// Fields extracted for an NGO
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgoRecord {
    /// Organisation name
    pub name: Option<String>,
    /// Where the organisation operates
    pub location: Option<String>,
    /// What the organisation does ("shelter", "vet clinic")
    pub kind: Option<String>,
    /// Phone number, e-mail or website
    pub contact: Option<String>,
}

/// One extracted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedEntry {
    /// Animal record
    Animal(AnimalRecord),
    /// NGO record
    Ngo(NgoRecord),
}

impl ExtractedEntry {
    /// Kind of this entry
    pub fn kind(&self) -> EntityKind {
        match self {
            ExtractedEntry::Animal(_) => EntityKind::Animal,
            ExtractedEntry::Ngo(_) => EntityKind::Ngo,
        }
    }

    /// Present, non-empty fields as `(field name, value)` pairs in the
    /// order of [`EntityKind::field_names`]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let values: Vec<&Option<String>> = match self {
            ExtractedEntry::Animal(a) => {
                vec![&a.kind, &a.age, &a.location, &a.contact, &a.drive_link]
            }
            ExtractedEntry::Ngo(n) => vec![&n.name, &n.location, &n.kind, &n.contact],
        };

        self.kind()
            .field_names()
            .iter()
            .copied()
            .zip(values)
            .filter_map(|(name, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((name, v)),
                _ => None,
            })
            .collect()
    }
}

/// Decoded model answer for one line of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Animal sub-record, if the model reported one
    pub animal: Option<AnimalRecord>,
    /// NGO sub-record, if the model reported one
    pub ngo: Option<NgoRecord>,
}

impl Analysis {
    /// One entry per present sub-record, animal first.
    ///
    /// A present record is written even when none of its fields carry a
    /// value; the entry then only has its header and source lines.
    pub fn entries(&self) -> Vec<ExtractedEntry> {
        let mut entries = Vec::new();
        if let Some(animal) = &self.animal {
            entries.push(ExtractedEntry::Animal(animal.clone()));
        }
        if let Some(ngo) = &self.ngo {
            entries.push(ExtractedEntry::Ngo(ngo.clone()));
        }
        entries
    }
}

/// Human-readable label for a field name: each `_`-separated segment is
/// capitalised (`drive_link` becomes `Drive_Link`)
pub fn field_label(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}
