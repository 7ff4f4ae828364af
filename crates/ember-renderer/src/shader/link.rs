//! Linking a vertex and fragment stage into one program interface.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use super::reflect::{BlockMember, StageInterface};
use super::uniforms::{AttributeRole, UniformKind, UniformRole, UniformSlot};
use super::{ShaderError, ShaderStage};

/// The resolved interface of a linked pair.
#[derive(Debug)]
pub(crate) struct LinkedInterface {
    pub block_size: u32,
    pub slots: HashMap<UniformRole, Option<UniformSlot>>,
    /// Declared vertex attributes with their locations, sorted by location.
    pub attributes: Vec<(AttributeRole, u32)>,
}

/// Check that `vertex` feeds `fragment` and resolve every vocabulary name.
///
/// All problems are reported together in one `ShaderError::Link`.
pub(crate) fn link(
    label: &str,
    vertex: &StageInterface,
    fragment: &StageInterface,
) -> Result<LinkedInterface, ShaderError> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        problems.push(format!(
            "expected a vertex and a fragment stage, got {} and {}",
            vertex.stage, fragment.stage
        ));
    }
    problems.extend(vertex.resource_problems.iter().map(|p| format!("vertex: {p}")));
    problems.extend(fragment.resource_problems.iter().map(|p| format!("fragment: {p}")));

    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|o| o.location == input.location) {
            None => problems.push(format!(
                "fragment input @location({}) has no matching vertex output",
                input.location
            )),
            Some(output) if output.label != input.label => problems.push(format!(
                "@location({}) is {} in the vertex stage but {} in the fragment stage",
                input.location, output.label, input.label
            )),
            Some(_) => {}
        }
    }
    if !fragment.outputs.iter().any(|o| o.location == 0) {
        problems.push("fragment stage does not write @location(0)".to_string());
    }

    let attributes = resolve_attributes(vertex, &mut problems);
    let (block_size, members) = merge_blocks(vertex, fragment, &mut problems);
    let slots = resolve_uniforms(label, &members, &mut problems);

    if !problems.is_empty() {
        return Err(ShaderError::Link {
            label: label.to_string(),
            diagnostic: problems.join("\n"),
        });
    }

    Ok(LinkedInterface {
        block_size,
        slots,
        attributes,
    })
}

fn resolve_attributes(
    vertex: &StageInterface,
    problems: &mut Vec<String>,
) -> Vec<(AttributeRole, u32)> {
    let mut attributes = Vec::new();
    for input in &vertex.inputs {
        let name = input.name.as_deref().unwrap_or("<unnamed>");
        let Some(role) = AttributeRole::from_name(name) else {
            problems.push(format!(
                "vertex input `{name}` at @location({}) is not a known attribute",
                input.location
            ));
            continue;
        };
        if !UniformKind::Vec4.matches(&input.inner) {
            problems.push(format!(
                "attribute `{name}` is {}, expected vec4<f32>",
                input.label
            ));
            continue;
        }
        attributes.push((role, input.location));
    }
    attributes.sort_by_key(|&(_, location)| location);
    attributes
}

/// Union of both stages' uniform members by name. Shared members must agree
/// on offset and type, and differently named members must not share bytes.
fn merge_blocks<'a>(
    vertex: &'a StageInterface,
    fragment: &'a StageInterface,
    problems: &mut Vec<String>,
) -> (u32, BTreeMap<&'a str, BlockMember>) {
    let mut merged: BTreeMap<&str, BlockMember> = BTreeMap::new();
    let mut size = 0;

    for block in [&vertex.block, &fragment.block].into_iter().flatten() {
        size = size.max(block.span);
        for member in &block.members {
            let Some(name) = member.name.as_deref() else {
                continue;
            };
            match merged.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(member.clone());
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if existing.offset != member.offset || existing.label != member.label {
                        problems.push(format!(
                            "uniform `{name}` disagrees between stages: {} at offset {} vs {} at offset {}",
                            existing.label, existing.offset, member.label, member.offset
                        ));
                    }
                    existing.used |= member.used;
                }
            }
        }
    }

    check_overlaps(&merged, problems);
    (size, merged)
}

/// Within one stage naga lays members out disjointly, so any overlap left in
/// the union is two stages naming the same bytes differently.
fn check_overlaps(merged: &BTreeMap<&str, BlockMember>, problems: &mut Vec<String>) {
    let mut ranges: Vec<(&str, u32, u32)> = merged
        .iter()
        .map(|(&name, m)| (name, m.offset, m.offset + m.size))
        .collect();
    ranges.sort_by_key(|&(_, start, _)| start);

    for (i, &(name, start, end)) in ranges.iter().enumerate() {
        for &(other, other_start, other_end) in &ranges[i + 1..] {
            if other_start >= end {
                break;
            }
            problems.push(format!(
                "uniforms `{name}` [{start}, {end}) and `{other}` [{other_start}, {other_end}) overlap between stages"
            ));
        }
    }
}

fn resolve_uniforms(
    label: &str,
    members: &BTreeMap<&str, BlockMember>,
    problems: &mut Vec<String>,
) -> HashMap<UniformRole, Option<UniformSlot>> {
    let mut slots = HashMap::with_capacity(UniformRole::ALL.len());
    for role in UniformRole::ALL {
        let kind = role.kind();
        let slot = match members.get(role.name()) {
            Some(member) if member.used => {
                if kind.matches(&member.inner) {
                    Some(UniformSlot {
                        offset: member.offset,
                        kind,
                    })
                } else {
                    problems.push(format!(
                        "uniform `{}` is {}, expected {}",
                        role.name(),
                        member.label,
                        kind.wgsl()
                    ));
                    None
                }
            }
            Some(_) => {
                tracing::debug!(program = label, uniform = role.name(), "uniform declared but never read");
                None
            }
            None => {
                tracing::debug!(program = label, uniform = role.name(), "uniform not declared");
                None
            }
        };
        slots.insert(role, slot);
    }
    slots
}
