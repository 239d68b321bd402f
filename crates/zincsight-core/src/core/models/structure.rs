use super::ids::AtomId;
use nalgebra::Point3;
use slotmap::SlotMap;

/// Element symbol of the synthetic ion injected at a predicted binding site.
pub const ZINC_ELEMENT: &str = "Zn";

/// A single atom as described by one `ATOM`/`HETATM` record of a structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// `true` for `HETATM` records, `false` for `ATOM` records.
    pub hetero: bool,
    /// Atom serial number.
    pub serial: u32,
    /// Atom name (e.g. "CA", "ZN").
    pub name: String,
    /// Residue name (e.g. "HIS", "ZN").
    pub residue_name: String,
    /// Chain identifier.
    pub chain_id: char,
    /// Residue sequence number.
    pub residue_number: i32,
    /// Cartesian position in Angstroms.
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub temperature_factor: f64,
    /// Element symbol as written in the file (e.g. "Zn", "C").
    pub element: String,
}

impl Atom {
    /// Builds the synthetic zinc ion record placed at a predicted coordinate.
    pub fn zinc_ion(position: Point3<f64>) -> Self {
        Self {
            hetero: true,
            serial: 9999,
            name: "ZN".to_string(),
            residue_name: "ZN".to_string(),
            chain_id: 'Z',
            residue_number: 1,
            position,
            occupancy: 1.0,
            temperature_factor: 1.0,
            element: ZINC_ELEMENT.to_string(),
        }
    }

    /// Whether the atom's element symbol equals `symbol`, ignoring ASCII case.
    pub fn is_element(&self, symbol: &str) -> bool {
        self.element.eq_ignore_ascii_case(symbol)
    }
}

/// A parsed molecular structure: one model of a trajectory, with stable atom handles.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    label: String,
    atoms: SlotMap<AtomId, Atom>,
    order: Vec<AtomId>,
}

impl Structure {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn from_atoms(label: impl Into<String>, atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut structure = Self::new(label);
        for atom in atoms {
            structure.add_atom(atom);
        }
        structure
    }

    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.order.push(id);
        id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Iterates atoms in file order together with their handles.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.order.iter().filter_map(|&id| self.atoms.get(id).map(|a| (id, a)))
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon(serial: u32, x: f64) -> Atom {
        Atom {
            hetero: false,
            serial,
            name: "CA".to_string(),
            residue_name: "HIS".to_string(),
            chain_id: 'A',
            residue_number: 10,
            position: Point3::new(x, 0.0, 0.0),
            occupancy: 1.0,
            temperature_factor: 50.0,
            element: "C".to_string(),
        }
    }

    #[test]
    fn zinc_ion_uses_fixed_identity_fields() {
        let ion = Atom::zinc_ion(Point3::new(1.0, 2.0, 3.0));
        assert!(ion.hetero);
        assert_eq!(ion.serial, 9999);
        assert_eq!(ion.chain_id, 'Z');
        assert_eq!(ion.residue_number, 1);
        assert!(ion.is_element("ZN"));
        assert!(ion.is_element("zn"));
    }

    #[test]
    fn structure_preserves_insertion_order() {
        let s = Structure::from_atoms("test", vec![carbon(3, 0.0), carbon(1, 1.0), carbon(2, 2.0)]);
        let serials: Vec<u32> = s.atoms().map(|(_, a)| a.serial).collect();
        assert_eq!(serials, vec![3, 1, 2]);
        assert_eq!(s.atom_count(), 3);
        assert_eq!(s.label(), "test");
    }

    #[test]
    fn atom_handles_resolve_to_their_atoms() {
        let mut s = Structure::new("test");
        let id = s.add_atom(carbon(7, 4.0));
        assert_eq!(s.atom(id).map(|a| a.serial), Some(7));
    }
}
