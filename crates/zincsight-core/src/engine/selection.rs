use crate::core::models::ids::{AtomId, StructureRef};
use crate::core::models::structure::{Atom, Structure};
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Selection id list is empty")]
    EmptyIdList,
    #[error("Selection id at position {0} is blank")]
    BlankId(usize),
}

/// A compiled atom selection: every atom whose element symbol equals one of `ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionQuery {
    ids: Vec<String>,
}

impl SelectionQuery {
    /// Compiles an element-symbol id list. Symbols are compared case-insensitively.
    pub fn compile_id_list<S: AsRef<str>>(ids: &[S]) -> Result<Self, QueryError> {
        if ids.is_empty() {
            return Err(QueryError::EmptyIdList);
        }
        let ids = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let id = id.as_ref().trim();
                if id.is_empty() {
                    Err(QueryError::BlankId(i))
                } else {
                    Ok(id.to_ascii_uppercase())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ids })
    }

    pub fn matches(&self, atom: &Atom) -> bool {
        self.ids.iter().any(|id| atom.is_element(id))
    }

    /// Resolves the query against a structure into a loci handle.
    pub fn resolve(&self, handle: StructureRef, structure: &Structure) -> Loci {
        let (atoms, positions): (Vec<AtomId>, Vec<Point3<f64>>) = structure
            .atoms()
            .filter(|(_, atom)| self.matches(atom))
            .map(|(id, atom)| (id, atom.position))
            .unzip();
        Loci {
            structure: handle,
            sphere: BoundingSphere::from_points(&positions),
            atoms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl BoundingSphere {
    /// Sphere centred on the centroid of `points` that encloses all of them.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let sum = points
            .iter()
            .fold(Point3::origin(), |acc, p| acc + p.coords);
        let center = sum / points.len() as f64;
        let radius = points
            .iter()
            .map(|p| nalgebra::distance(&center, p))
            .fold(0.0, f64::max);
        Some(Self { center, radius })
    }
}

/// A set of atoms within one loaded structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Loci {
    pub structure: StructureRef,
    pub atoms: Vec<AtomId>,
    pub sphere: Option<BoundingSphere>,
}

impl Loci {
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn atom(name: &str, element: &str, position: Point3<f64>) -> Atom {
        Atom {
            hetero: false,
            serial: 1,
            name: name.to_string(),
            residue_name: "CYS".to_string(),
            chain_id: 'A',
            residue_number: 5,
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
            element: element.to_string(),
        }
    }

    #[test]
    fn empty_or_blank_id_lists_do_not_compile() {
        let empty: [&str; 0] = [];
        assert_eq!(
            SelectionQuery::compile_id_list(&empty),
            Err(QueryError::EmptyIdList)
        );
        assert_eq!(
            SelectionQuery::compile_id_list(&["ZN", " "]),
            Err(QueryError::BlankId(1))
        );
    }

    #[test]
    fn element_query_matches_case_insensitively() {
        let query = SelectionQuery::compile_id_list(&["ZN"]).unwrap();
        assert!(query.matches(&atom("ZN", "Zn", Point3::origin())));
        assert!(!query.matches(&atom("SG", "S", Point3::origin())));
    }

    #[test]
    fn element_query_ignores_atom_and_residue_names() {
        let query = SelectionQuery::compile_id_list(&["ZN"]).unwrap();
        let mut decoy = atom("ZN", "C", Point3::origin());
        decoy.residue_name = "ZN".to_string();
        assert!(!query.matches(&decoy));
    }

    #[test]
    fn resolve_collects_matching_atoms_with_bounds() {
        let structure = Structure::from_atoms(
            "test",
            vec![
                atom("SG", "S", Point3::new(9.0, 9.0, 9.0)),
                atom("ZN", "ZN", Point3::new(0.0, 0.0, 0.0)),
                atom("ZN", "Zn", Point3::new(2.0, 0.0, 0.0)),
            ],
        );
        let mut handles: SlotMap<StructureRef, ()> = SlotMap::with_key();
        let handle = handles.insert(());

        let query = SelectionQuery::compile_id_list(&["zn"]).unwrap();
        let loci = query.resolve(handle, &structure);

        assert_eq!(loci.len(), 2);
        let sphere = loci.sphere.unwrap();
        assert_eq!(sphere.center, Point3::new(1.0, 0.0, 0.0));
        assert!((sphere.radius - 1.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_without_matches_yields_empty_loci() {
        let structure = Structure::from_atoms("test", vec![atom("SG", "S", Point3::origin())]);
        let mut handles: SlotMap<StructureRef, ()> = SlotMap::with_key();
        let query = SelectionQuery::compile_id_list(&["ZN"]).unwrap();

        let loci = query.resolve(handles.insert(()), &structure);
        assert!(loci.is_empty());
        assert_eq!(loci.sphere, None);
    }
}
