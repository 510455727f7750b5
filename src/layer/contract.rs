//! Layer contraction
//!
//! For threshold L, every edge either survives or is cut; a cut node
//! becomes its own local root. Cuts only ever replace an edge with a
//! self-loop, so no cycle can appear that was not in the input.

use std::fmt;
use std::str::FromStr;

use crate::MaskError;

/// Which height decides whether an edge survives a layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "visualize", serde(rename_all = "kebab-case"))]
pub enum EdgePolicy {
    /// Keep `i → father[i]` iff `height[father[i]] <= L + 1`
    #[default]
    ParentHeight,

    /// Keep `i → father[i]` iff `height[i] <= L`
    SelfHeight,
}

impl EdgePolicy {
    /// Whether the edge from a node to its parent survives layer `layer`
    #[inline]
    pub fn keeps_edge(self, node_height: usize, parent_height: usize, layer: usize) -> bool {
        match self {
            EdgePolicy::ParentHeight => parent_height <= layer + 1,
            EdgePolicy::SelfHeight => node_height <= layer,
        }
    }

    /// Stable name used on the command line and in exports
    pub fn as_str(self) -> &'static str {
        match self {
            EdgePolicy::ParentHeight => "parent-height",
            EdgePolicy::SelfHeight => "self-height",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgePolicy {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent-height" | "parent" => Ok(EdgePolicy::ParentHeight),
            "self-height" | "self" => Ok(EdgePolicy::SelfHeight),
            other => Err(MaskError::InvalidConfiguration(format!(
                "unknown edge policy '{}' (expected parent-height or self-height)",
                other
            ))),
        }
    }
}

/// Parent array after cutting the edges a layer does not keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractedParents {
    father: Vec<usize>,
}

impl ContractedParents {
    /// Wrap a raw contracted array, e.g. from an untrusted source
    pub fn from_raw(father: Vec<usize>) -> Self {
        Self { father }
    }

    /// Contracted parent indices
    pub fn as_slice(&self) -> &[usize] {
        &self.father
    }

    /// Number of local roots (self-loops)
    pub fn local_roots(&self) -> usize {
        self.father.iter().enumerate().filter(|&(i, &p)| i == p).count()
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.father.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.father.is_empty()
    }
}

/// Cut every edge `policy` does not keep at `layer`
pub fn contract(
    father: &[usize],
    height: &[usize],
    layer: usize,
    policy: EdgePolicy,
) -> Result<ContractedParents, MaskError> {
    if father.len() != height.len() {
        return Err(MaskError::LengthMismatch {
            parents: father.len(),
            heights: height.len(),
        });
    }

    let contracted = father
        .iter()
        .enumerate()
        .map(|(i, &parent)| {
            let parent_height = *height.get(parent).ok_or_else(|| {
                MaskError::malformed(format!(
                    "node {} points to parent {} outside 0..{}",
                    i,
                    parent,
                    father.len()
                ))
            })?;
            Ok(if policy.keeps_edge(height[i], parent_height, layer) {
                parent
            } else {
                i
            })
        })
        .collect::<Result<Vec<_>, MaskError>>()?;

    Ok(ContractedParents { father: contracted })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario tree in height order:
    // S VP NP NP D N V D N the dog chased the cat
    const FATHER: [usize; 14] = [0, 0, 0, 1, 2, 2, 1, 3, 3, 4, 5, 6, 7, 8];
    const HEIGHT: [usize; 14] = [5, 4, 3, 3, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1];

    #[test]
    fn test_parent_height_cuts() {
        let layer0 = contract(&FATHER, &HEIGHT, 0, EdgePolicy::ParentHeight).unwrap();
        assert_eq!(layer0.local_roots(), 14);

        let layer1 = contract(&FATHER, &HEIGHT, 1, EdgePolicy::ParentHeight).unwrap();
        assert_eq!(
            layer1.as_slice(),
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 4, 5, 6, 7, 8]
        );

        let layer3 = contract(&FATHER, &HEIGHT, 3, EdgePolicy::ParentHeight).unwrap();
        assert_eq!(
            layer3.as_slice(),
            &[0, 1, 2, 1, 2, 2, 1, 3, 3, 4, 5, 6, 7, 8]
        );

        let layer4 = contract(&FATHER, &HEIGHT, 4, EdgePolicy::ParentHeight).unwrap();
        assert_eq!(layer4.as_slice(), &FATHER);
    }

    #[test]
    fn test_self_height_cuts() {
        let layer2 = contract(&FATHER, &HEIGHT, 2, EdgePolicy::SelfHeight).unwrap();
        // V (height 2) keeps its edge to VP; the NPs (height 3) do not
        assert_eq!(
            layer2.as_slice(),
            &[0, 1, 2, 3, 2, 2, 1, 3, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            contract(&[0, 0], &[2], 0, EdgePolicy::ParentHeight),
            Err(MaskError::LengthMismatch {
                parents: 2,
                heights: 1
            })
        );
    }

    #[test]
    fn test_out_of_range_parent() {
        assert!(matches!(
            contract(&[0, 7], &[2, 1], 3, EdgePolicy::ParentHeight),
            Err(MaskError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_policy_names_round_trip() {
        for policy in [EdgePolicy::ParentHeight, EdgePolicy::SelfHeight] {
            assert_eq!(policy.to_string().parse::<EdgePolicy>().unwrap(), policy);
        }
        assert_eq!("self".parse::<EdgePolicy>().unwrap(), EdgePolicy::SelfHeight);
        assert!("sideways".parse::<EdgePolicy>().is_err());
    }
}
