//! Size arithmetic for sections and subdivisions
//!
//! Every sibling group (the sections of a structure, or the subdivisions of
//! one section) sums to 100 and keeps each member inside
//! `[min_size, dynamic_max]`. All adjustments are closed-form: the delta is
//! shared out in proportion to the siblings' sizes, each sibling is clamped
//! to its bounds, and one rescale pass brings the group back to 100.

use log::debug;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::types::{Section, Structure};

const EPSILON: f64 = 1e-9;

/// `n` equal shares of 100
pub fn equal_shares(n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![];
    }
    vec![100.0 / n as f64; n]
}

/// Check that a group sums to 100 and every member is inside its bounds
pub fn is_balanced(sizes: &[f64], config: &LayoutConfig) -> bool {
    match sizes.len() {
        0 => true,
        1 => (sizes[0] - 100.0).abs() <= config.tolerance,
        n => {
            let max = config.dynamic_max(n);
            let sum: f64 = sizes.iter().sum();
            (sum - 100.0).abs() <= config.tolerance
                && sizes
                    .iter()
                    .all(|&s| s >= config.min_size - config.tolerance && s <= max + config.tolerance)
        }
    }
}

/// Bring an arbitrary group of sizes into a valid state
///
/// Values already summing to 100 within tolerance and inside the bounds are
/// returned unchanged.
pub fn normalize_group(sizes: &[f64], config: &LayoutConfig) -> Vec<f64> {
    let n = sizes.len();
    match n {
        0 => return vec![],
        1 => return vec![100.0],
        _ => {}
    }
    if n as f64 * config.min_size > 100.0 {
        debug!("{} siblings cannot each keep {}%, using equal shares", n, config.min_size);
        return equal_shares(n);
    }

    let max = config.dynamic_max(n);
    let mut clamped: Vec<f64> = sizes
        .iter()
        .map(|&s| {
            if s.is_finite() {
                s.clamp(config.min_size, max)
            } else {
                config.min_size
            }
        })
        .collect();

    redistribute(&mut clamped, 100.0, config.min_size, max);
    clamped
}

/// Set one member of a group to `requested`, redistributing the difference
/// among its siblings
pub fn resize_in_group(
    sizes: &[f64],
    index: usize,
    requested: f64,
    config: &LayoutConfig,
) -> Vec<f64> {
    let mut sizes = normalize_group(sizes, config);
    let n = sizes.len();
    if n <= 1 || index >= n {
        return sizes;
    }

    let max = config.dynamic_max(n);
    let target = if requested.is_finite() {
        requested.clamp(config.min_size, max)
    } else {
        sizes[index]
    };
    if target != requested {
        debug!("clamped size {} to {}", requested, target);
    }

    let mut others: Vec<f64> = sizes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, &s)| s)
        .collect();
    redistribute(&mut others, 100.0 - target, config.min_size, max);

    let mut rest = others.into_iter();
    for (i, size) in sizes.iter_mut().enumerate() {
        if i == index {
            *size = target;
        } else if let Some(value) = rest.next() {
            *size = value;
        }
    }
    sizes
}

/// Adjust `values` so they sum to `total` and stay inside `[min, max]`
///
/// Each value takes a share of the difference proportional to its size and
/// is clamped. What clamping cut off or added is then rescaled onto the
/// values still free to move, in proportion to their room before the bound.
fn redistribute(values: &mut [f64], total: f64, min: f64, max: f64) {
    let sum: f64 = values.iter().sum();
    if (total - sum).abs() < EPSILON {
        return;
    }

    if sum > EPSILON {
        let factor = total / sum;
        values.iter_mut().for_each(|v| *v = (*v * factor).clamp(min, max));
    } else {
        let share = (total / values.len() as f64).clamp(min, max);
        values.iter_mut().for_each(|v| *v = share);
    }

    let residual = total - values.iter().sum::<f64>();
    if residual.abs() < EPSILON {
        return;
    }
    let rooms: Vec<f64> = if residual > 0.0 {
        values.iter().map(|&v| (max - v).max(0.0)).collect()
    } else {
        values.iter().map(|&v| (v - min).max(0.0)).collect()
    };
    let total_room: f64 = rooms.iter().sum();
    if total_room < EPSILON {
        return;
    }
    let factor = (residual / total_room).clamp(-1.0, 1.0);
    for (value, room) in values.iter_mut().zip(rooms) {
        *value += factor * room;
    }
}

/// Append a section; all sections end up with equal shares
///
/// Returns the index of the new section.
pub fn add_section(structure: &mut Structure, config: &LayoutConfig) -> Result<usize, LayoutError> {
    if structure.len() >= config.max_sections {
        return Err(LayoutError::TooManySections {
            max: config.max_sections,
        });
    }
    let share = 100.0 / (structure.len() + 1) as f64;
    for section in structure.iter_mut() {
        section.size = share;
    }
    structure.push(Section::new(share, 1));
    Ok(structure.len() - 1)
}

/// Remove a section; the survivors are rebalanced to equal shares
pub fn remove_section(structure: &mut Structure, index: usize) -> Result<Section, LayoutError> {
    if index >= structure.len() {
        return Err(LayoutError::section_out_of_range(index, structure.len()));
    }
    if structure.len() == 1 {
        return Err(LayoutError::LastSection);
    }
    let removed = structure.remove(index);
    let share = 100.0 / structure.len() as f64;
    for section in structure.iter_mut() {
        section.size = share;
    }
    Ok(removed)
}

/// Change the number of subdivisions of a section, resetting them to equal shares
pub fn set_subdivisions(
    structure: &mut Structure,
    index: usize,
    count: usize,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    let len = structure.len();
    let section = structure
        .get_mut(index)
        .ok_or_else(|| LayoutError::section_out_of_range(index, len))?;
    let count = count.clamp(1, config.max_subdivisions);
    section.subdivisions = count;
    section.sub_sizes = equal_shares(count);
    Ok(())
}

/// Resize a section along the primary axis
pub fn resize_section(
    structure: &mut Structure,
    index: usize,
    size: f64,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    if index >= structure.len() {
        return Err(LayoutError::section_out_of_range(index, structure.len()));
    }
    let sizes: Vec<f64> = structure.iter().map(|s| s.size).collect();
    let resized = resize_in_group(&sizes, index, size, config);
    for (section, size) in structure.iter_mut().zip(resized) {
        section.size = size;
    }
    Ok(())
}

/// Resize a subdivision along the secondary axis
pub fn resize_subdivision(
    structure: &mut Structure,
    section_index: usize,
    sub_index: usize,
    size: f64,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    let len = structure.len();
    let section = structure
        .get_mut(section_index)
        .ok_or_else(|| LayoutError::section_out_of_range(section_index, len))?;
    if sub_index >= section.sub_sizes.len() {
        return Err(LayoutError::subdivision_out_of_range(
            section_index,
            sub_index,
            section.sub_sizes.len(),
        ));
    }
    section.sub_sizes = resize_in_group(&section.sub_sizes, sub_index, size, config);
    Ok(())
}
