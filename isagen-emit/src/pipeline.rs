//! Three-phase generation pipeline
//!
//! Every artifact is one or more sections. A section is an [`Emitter`] driven
//! through `prefix`, then `opcode` once per descriptor in table order, then
//! `suffix`. The ordinal every artifact agrees on is the table order, so the
//! traversal is single-pass and never reordered.

use crate::artifact::ArtifactKind;
use crate::error::{EmitError, Result};
use crate::formatter::{Formatter, Fragment};
use isagen_spec::{OpcodeDescriptor, OpcodeTable, Requirement};

/// Provenance banner written once at the top of every artifact
pub const BANNER: [&str; 2] = [
    "// this file is autogenerated, do not edit manually",
    "// to change this file edit the opcode table and re-run isagen",
];

/// One section of an artifact
pub trait Emitter {
    /// Fields this section reads, and whether absence is tolerated
    fn requirements(&self) -> &'static [Requirement] {
        &[]
    }

    /// Section-specific constraints on a descriptor; `Err` carries the reason
    fn validate(&self, _descriptor: &OpcodeDescriptor) -> std::result::Result<(), String> {
        Ok(())
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        Vec::new()
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment>;

    fn suffix(&mut self) -> Vec<Fragment> {
        Vec::new()
    }
}

/// Check a section's requirements against every descriptor
pub fn check(kind: ArtifactKind, table: &OpcodeTable, emitter: &dyn Emitter) -> Result<()> {
    for descriptor in table {
        for requirement in emitter.requirements() {
            descriptor
                .check(requirement)
                .map_err(|source| EmitError::Validation {
                    artifact: kind,
                    source,
                })?;
        }
        emitter
            .validate(descriptor)
            .map_err(|reason| EmitError::Unsupported {
                artifact: kind,
                opcode: descriptor.name.clone(),
                reason,
            })?;
    }
    Ok(())
}

/// Drive one section over the table
pub fn run(emitter: &mut dyn Emitter, table: &OpcodeTable, fmt: &mut Formatter) {
    fmt.extend(emitter.prefix());
    for descriptor in table {
        fmt.extend(emitter.opcode(descriptor));
    }
    fmt.extend(emitter.suffix());
}

/// Validate every section, then render banner and sections into one artifact
pub fn render<'a>(
    kind: ArtifactKind,
    table: &OpcodeTable,
    mut sections: Vec<Box<dyn Emitter + 'a>>,
) -> Result<String> {
    for section in &sections {
        check(kind, table, section.as_ref())?;
    }

    let mut fmt = Formatter::new();
    fmt.extend(BANNER.iter().map(|line| Fragment::line(*line)));
    for section in sections.iter_mut() {
        run(section.as_mut(), table, &mut fmt);
    }

    tracing::debug!(artifact = %kind, lines = fmt.len(), "rendered artifact");
    Ok(fmt.render())
}

/// Box an emitter as one section of an artifact
pub fn section<'a, E: Emitter + 'a>(emitter: E) -> Box<dyn Emitter + 'a> {
    Box::new(emitter)
}

/// A plain enum with one variant per opcode, payload chosen per descriptor
pub struct EnumEmitter {
    derives: &'static str,
    name: &'static str,
    payload: fn(&OpcodeDescriptor) -> Vec<String>,
    requirements: &'static [Requirement],
}

impl EnumEmitter {
    pub fn new(
        derives: &'static str,
        name: &'static str,
        payload: fn(&OpcodeDescriptor) -> Vec<String>,
        requirements: &'static [Requirement],
    ) -> Self {
        Self {
            derives,
            name,
            payload,
            requirements,
        }
    }
}

impl Emitter for EnumEmitter {
    fn requirements(&self) -> &'static [Requirement] {
        self.requirements
    }

    fn prefix(&mut self) -> Vec<Fragment> {
        vec![
            Fragment::line(format!("#[derive({})]", self.derives)),
            Fragment::open(format!("pub enum {} {{", self.name)),
        ]
    }

    fn opcode(&mut self, descriptor: &OpcodeDescriptor) -> Vec<Fragment> {
        vec![Fragment::line(format!(
            "{}{},",
            descriptor.name,
            tuple(&(self.payload)(descriptor))
        ))]
    }

    fn suffix(&mut self) -> Vec<Fragment> {
        vec![Fragment::close("}")]
    }
}

/// `(a, b)` for a non-empty list, nothing otherwise
pub fn tuple<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("({})", items.join(", "))
}

/// Pattern matching any payload of a variant: `(..)` or nothing
pub fn any_payload(has_payload: bool) -> &'static str {
    if has_payload {
        "(..)"
    } else {
        ""
    }
}

/// Last segment of a Rust path (`crate::a::B` -> `B`)
pub fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
