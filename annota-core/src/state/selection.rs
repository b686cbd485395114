//! # Selection
//!
//! A view onto shapes held by layers. Members name shapes by [`ShapeID`] rather than holding
//! on to them, so a shape deleted elsewhere can be purged and never dangles.

use crate::shape::ShapeID;

/// What kind of thing is selected, derived from the members.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, strum::AsRefStr)]
pub enum SelectionMode {
    #[default]
    None,
    /// Whole shapes.
    Element,
    /// Individual control points of shapes.
    Subobjects,
}

/// How [`Selection::set`] combines new members with the existing ones.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, strum::AsRefStr, strum::EnumIter)]
pub enum Combine {
    #[default]
    Replace,
    Add,
    Remove,
    Invert,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Member {
    Shape(ShapeID),
    Point { shape: ShapeID, index: usize },
}
impl Member {
    #[must_use]
    pub fn shape(&self) -> ShapeID {
        match self {
            Self::Shape(shape) | Self::Point { shape, .. } => *shape,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Selection {
    /// Rule used by [`Self::set`].
    pub combine: Combine,
    members: Vec<Member>,
}
impl Selection {
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }
    #[must_use]
    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        if self.members.is_empty() {
            SelectionMode::None
        } else if self
            .members
            .iter()
            .any(|member| matches!(member, Member::Point { .. }))
        {
            SelectionMode::Subobjects
        } else {
            SelectionMode::Element
        }
    }
    /// Every shape involved, once each, in selection order.
    #[must_use]
    pub fn shapes(&self) -> Vec<ShapeID> {
        let mut seen = hashbrown::HashSet::new();
        self.members
            .iter()
            .map(Member::shape)
            .filter(|shape| seen.insert(*shape))
            .collect()
    }
    /// Combine `elements` into the selection according to [`Self::combine`].
    /// `None` clears under [`Combine::Replace`] and does nothing otherwise.
    pub fn set(&mut self, elements: Option<&[Member]>) {
        match (self.combine, elements) {
            (Combine::Replace, None) => self.clear(),
            (_, None) => (),
            (Combine::Replace, Some(elements)) => {
                self.clear();
                self.add(elements);
            }
            (Combine::Add, Some(elements)) => self.add(elements),
            (Combine::Remove, Some(elements)) => {
                for element in elements {
                    self.remove(element);
                }
            }
            (Combine::Invert, Some(elements)) => self.invert(elements),
        }
    }
    /// Append members not already present.
    pub fn add(&mut self, elements: &[Member]) {
        for element in elements {
            if !self.members.contains(element) {
                self.members.push(*element);
            }
        }
    }
    /// Remove a member. Removing something that isn't selected does nothing and returns false.
    pub fn remove(&mut self, element: &Member) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != element);
        self.members.len() != before
    }
    /// Toggle membership of each element.
    pub fn invert(&mut self, elements: &[Member]) {
        for element in elements {
            if !self.remove(element) {
                self.members.push(*element);
            }
        }
    }
    pub fn clear(&mut self) {
        self.members.clear();
    }
    /// Drop every member referring to `shape`.
    pub fn purge_shape(&mut self, shape: ShapeID) {
        self.members.retain(|member| member.shape() != shape);
    }
    /// Drop every member whose shape (or point) no longer exists.
    pub fn retain_existing(&mut self, stack: &super::LayerStack) {
        let mut points = hashbrown::HashMap::new();
        for shape in stack.layers().iter().flat_map(|layer| &layer.shapes) {
            points.insert(shape.id(), shape.point_count());
        }
        self.members.retain(|member| match member {
            Member::Shape(shape) => points.contains_key(shape),
            Member::Point { shape, index } => points.get(shape).is_some_and(|count| index < count),
        });
    }
}
