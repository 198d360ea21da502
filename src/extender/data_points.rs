use crate::metadata::Uid;
use crate::variable::Variable;

use super::ExtenderError;

/// Parameter coordinates of a block of data points
///
/// Constant parameters hold one value for the whole block; varying parameters
/// advance together, one value per data point. Containers list the constant
/// parameters first, followed by the varying ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSweep {
    /// Parameters fixed for the whole block
    pub constant: Vec<(Uid, Variable)>,
    /// Parameters iterated together with the data points
    pub varying: Vec<(Uid, Vec<Variable>)>,
}

impl ParameterSweep {
    /// Start an empty sweep
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter fixed to a single value
    pub fn with_constant(mut self, parameter: Uid, value: impl Into<Variable>) -> Self {
        self.constant.push((parameter, value.into()));
        self
    }

    /// Add a parameter iterated together with the data points
    pub fn with_varying(mut self, parameter: Uid, values: Vec<Variable>) -> Self {
        self.varying.push((parameter, values));
        self
    }

    /// Parameter identifiers in container order
    pub fn parameter_ids(&self) -> Vec<Uid> {
        self.constant
            .iter()
            .map(|(uid, _)| *uid)
            .chain(self.varying.iter().map(|(uid, _)| *uid))
            .collect()
    }

    /// Number of data points the sweep spans
    ///
    /// All varying parameters must have the same number of values. Without
    /// varying parameters the sweep is a single point.
    pub fn point_count(&self) -> Result<usize, ExtenderError> {
        let mut counts = self.varying.iter().map(|(_, values)| values.len());
        let Some(first) = counts.next() else {
            return Ok(1);
        };
        if counts.all(|count| count == first) {
            return Ok(first);
        }
        let detail: Vec<String> = self
            .varying
            .iter()
            .map(|(uid, values)| format!("parameter {}: {} entries", uid, values.len()))
            .collect();
        Err(ExtenderError::InvalidData(format!(
            "An unequal number of parameter values was detected ({})",
            detail.join(", ")
        )))
    }

    /// Parameter values of the data point at `position`
    pub fn coordinate(&self, position: usize) -> Vec<Variable> {
        self.constant
            .iter()
            .map(|(_, value)| value.clone())
            .chain(
                self.varying
                    .iter()
                    .filter_map(|(_, values)| values.get(position).cloned()),
            )
            .collect()
    }
}

/// Quantity samples for a block of parameter coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DataPoints {
    /// One scalar per point, for a quantity with a single value description
    Curve(Vec<Variable>),
    /// Real and imaginary part per point, for a quantity with two value descriptions
    ComplexCurve {
        /// Real parts
        real: Vec<Variable>,
        /// Imaginary parts
        imag: Vec<Variable>,
    },
    /// Network parameters: `ports²` entries per point and component
    SParameter {
        /// Number of ports
        ports: u32,
        /// First component (e.g. real part or magnitude), one matrix per point
        first: Vec<Vec<Variable>>,
        /// Second component (e.g. imaginary part or phase), one matrix per point
        second: Vec<Vec<Variable>>,
    },
}

impl DataPoints {
    /// Number of value descriptions the target quantity must have
    pub fn component_count(&self) -> usize {
        match self {
            DataPoints::Curve(_) => 1,
            DataPoints::ComplexCurve { .. } | DataPoints::SParameter { .. } => 2,
        }
    }

    /// Bucket size that groups one parameter point into one container
    pub fn bucket_size(&self) -> usize {
        match self {
            DataPoints::Curve(_) | DataPoints::ComplexCurve { .. } => 1,
            DataPoints::SParameter { ports, .. } => (*ports as usize) * (*ports as usize),
        }
    }

    /// Check the block against the number of parameter points
    pub fn validate(&self, point_count: usize) -> Result<(), ExtenderError> {
        match self {
            DataPoints::Curve(values) => {
                if values.is_empty() {
                    return Err(ExtenderError::InvalidData(
                        "Curve values are missing".to_string(),
                    ));
                }
                check_count("values", values.len(), point_count)
            }
            DataPoints::ComplexCurve { real, imag } => {
                check_pair(real.len(), imag.len())?;
                check_count("real values", real.len(), point_count)?;
                check_count("imaginary values", imag.len(), point_count)
            }
            DataPoints::SParameter {
                ports,
                first,
                second,
            } => {
                check_pair(first.len(), second.len())?;
                check_count("first values", first.len(), point_count)?;
                check_count("second values", second.len(), point_count)?;
                let entries = (*ports as usize) * (*ports as usize);
                if entries == 0 {
                    return Err(ExtenderError::InvalidData(
                        "S-parameters need at least one port".to_string(),
                    ));
                }
                for (position, matrix) in first.iter().chain(second.iter()).enumerate() {
                    if matrix.len() != entries {
                        return Err(ExtenderError::InvalidData(format!(
                            "Matrix {} holds {} entries, expected {} for {} ports",
                            position % point_count.max(1),
                            matrix.len(),
                            entries,
                            ports
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

fn check_pair(first: usize, second: usize) -> Result<(), ExtenderError> {
    if first == 0 || second == 0 {
        return Err(ExtenderError::InvalidData(
            "Complex values are missing either the imaginary or the real part".to_string(),
        ));
    }
    if first != second {
        return Err(ExtenderError::InvalidData(format!(
            "Unequal amount of real and imaginary numbers ({} vs {})",
            first, second
        )));
    }
    Ok(())
}

fn check_count(what: &str, count: usize, point_count: usize) -> Result<(), ExtenderError> {
    if count != point_count {
        return Err(ExtenderError::InvalidData(format!(
            "Number of {} ({}) does not match the number of parameter values ({})",
            what, count, point_count
        )));
    }
    Ok(())
}
