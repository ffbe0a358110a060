//! The mesh bender component.

use std::cell::{Cell, RefCell};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::rc::{Rc, Weak};

use mesh_types::{Aabb, IndexedMesh, MeshBounds, Point3, Vector3};
use nalgebra::UnitQuaternion;
use tracing::{debug, trace, warn};

use crate::cache::SampleCache;
use crate::error::{BendError, BendResult};
use crate::notify::Subscription;
use crate::params::{BendParams, DegenerateExtentPolicy};
use crate::placement::Placement;
use crate::sample::{CurveSample, CurveSampler};
use crate::stats::BendStats;

/// Extent of the placed source mesh along the bend axis (local X).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendExtent {
    /// Smallest bend-axis coordinate.
    pub min_x: f64,
    /// Distance between the smallest and largest bend-axis coordinate.
    pub length: f64,
}

impl BendExtent {
    /// Measure the extent of a set of bend-axis coordinates.
    ///
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn measure(xs: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut xs = xs.into_iter();
        let first = xs.next()?;
        let (min_x, max_x) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
        Some(Self {
            min_x,
            length: max_x - min_x,
        })
    }

    /// Largest bend-axis coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.length
    }

    /// Check if the extent has no usable length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length <= 0.0 || !self.length.is_finite()
    }

    /// Fraction of the curve at which a vertex with bend-axis coordinate `x`
    /// is placed, clamped to `[0, 1]`.
    #[must_use]
    pub fn distance_rate(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((x - self.min_x).abs() / self.length).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct BendVertex {
    position: Point3<f64>,
    normal: Vector3<f64>,
}

/// Placement-dependent data, rebuilt only when the bender is dirty.
#[derive(Debug, Clone)]
struct PlacedData {
    vertices: Vec<BendVertex>,
    extent: BendExtent,
    winding_reversed: bool,
}

/// Rotation taking the mesh's bend axis (+X) onto the curve's forward
/// axis (+Z), about the shared up axis (+Y).
fn bend_axis_to_forward() -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -FRAC_PI_2)
}

/// Lay one placed vertex into a curve sample's frame.
fn bend_vertex(
    vertex: &BendVertex,
    sample: &CurveSample,
    to_forward: &UnitQuaternion<f64>,
) -> (Point3<f64>, Vector3<f64>) {
    let roll = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), sample.roll.to_radians());
    let mut offset = roll
        * Vector3::new(
            0.0,
            vertex.position.y * sample.scale.y,
            vertex.position.z * sample.scale.x,
        );
    offset.x = 0.0;
    let normal = roll * vertex.normal;

    let frame = sample.rotation * to_forward;
    (sample.location + frame * offset, frame * normal)
}

/// Bends a source mesh along a curve.
///
/// The bender holds shared handles to a source mesh and a curve, plus a
/// [`Placement`] applied to the source first. Setters only record state;
/// [`Self::compute`] produces the bent mesh. Placement data is rebuilt only
/// when the source or placement changed since the last compute, while the
/// curve is re-sampled on every compute.
///
/// Curve edits are observed through the curve's
/// [`ChangeNotifier`](crate::ChangeNotifier). A bender made with
/// [`Self::new`] only marks itself as needing a recompute, which its owner
/// performs with [`Self::compute_if_needed`]. A bender made with
/// [`Self::shared`] recomputes from inside the notification. Dropping the
/// bender or calling [`Self::clear_curve_sampler`] unsubscribes.
///
/// # Example
///
/// ```
/// use mesh_bend::{CubicBezierCurve, MeshBender};
/// use mesh_types::{unit_cube, MeshTopology};
/// use nalgebra::Point3;
/// use std::rc::Rc;
///
/// let curve = Rc::new(CubicBezierCurve::straight(
///     Point3::origin(),
///     Point3::new(0.0, 0.0, 10.0),
/// ));
///
/// let mut bender = MeshBender::new();
/// bender.set_source(Rc::new(unit_cube()))?;
/// bender.set_curve_sampler(curve.clone());
///
/// let stats = bender.compute()?;
/// assert_eq!(stats.vertices_bent, 8);
///
/// let bent = bender.output().unwrap();
/// assert_eq!(bent.face_count(), 12);
/// # Ok::<(), mesh_bend::BendError>(())
/// ```
pub struct MeshBender {
    params: BendParams,
    source: Option<Rc<IndexedMesh>>,
    source_vertices: Vec<BendVertex>,
    source_has_normals: bool,
    placement: Placement,
    curve: Option<Rc<dyn CurveSampler>>,
    subscription: Option<Subscription>,
    curve_stale: Rc<Cell<bool>>,
    self_handle: Option<Weak<RefCell<MeshBender>>>,
    dirty: bool,
    placed: Option<PlacedData>,
    output: Option<IndexedMesh>,
    output_bounds: Option<Aabb>,
    revision: u64,
}

impl fmt::Debug for MeshBender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshBender")
            .field("params", &self.params)
            .field("source_vertices", &self.source_vertices.len())
            .field("placement", &self.placement)
            .field("has_curve", &self.curve.is_some())
            .field("dirty", &self.dirty)
            .field("curve_stale", &self.curve_stale.get())
            .field("shared", &self.self_handle.is_some())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for MeshBender {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBender {
    /// Create a bender with default params and an identity placement.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(BendParams::default())
    }

    /// Create a bender with custom params.
    #[must_use]
    pub fn with_params(params: BendParams) -> Self {
        Self {
            params,
            source: None,
            source_vertices: Vec::new(),
            source_has_normals: false,
            placement: Placement::identity(),
            curve: None,
            subscription: None,
            curve_stale: Rc::new(Cell::new(false)),
            self_handle: None,
            dirty: true,
            placed: None,
            output: None,
            output_bounds: None,
            revision: 0,
        }
    }

    /// Create a bender behind a shared handle that recomputes itself
    /// whenever its curve reports a change.
    ///
    /// The recompute runs inside the curve's notification. If the bender is
    /// borrowed at that moment the change stays pending and is picked up by
    /// the next [`Self::compute_if_needed`]. Failures are logged, and the
    /// previous output is kept.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_bend::{BendParams, CubicBezierCurve, MeshBender};
    /// use mesh_types::unit_cube;
    /// use nalgebra::Point3;
    /// use std::rc::Rc;
    ///
    /// let curve = Rc::new(CubicBezierCurve::straight(
    ///     Point3::origin(),
    ///     Point3::new(0.0, 0.0, 10.0),
    /// ));
    /// let bender = MeshBender::shared(BendParams::default());
    /// bender.borrow_mut().set_source(Rc::new(unit_cube()))?;
    /// bender.borrow_mut().set_curve_sampler(curve.clone());
    /// bender.borrow_mut().compute()?;
    ///
    /// let mut end = curve.end();
    /// end.position.z = 20.0;
    /// end.direction.z = 25.0;
    /// curve.set_end(end);
    ///
    /// assert_eq!(bender.borrow().revision(), 2);
    /// assert!(!bender.borrow().needs_compute());
    /// # Ok::<(), mesh_bend::BendError>(())
    /// ```
    #[must_use]
    pub fn shared(params: BendParams) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|handle| {
            let mut bender = Self::with_params(params);
            bender.self_handle = Some(handle.clone());
            RefCell::new(bender)
        })
    }

    /// Check if curve changes trigger a recompute without the owner asking.
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.self_handle.is_some()
    }

    /// Bending params.
    #[must_use]
    pub const fn params(&self) -> &BendParams {
        &self.params
    }

    /// Replace the params. Marks the bender dirty if they changed.
    pub fn set_params(&mut self, params: BendParams) {
        if self.params != params {
            self.params = params;
            self.dirty = true;
        }
    }

    /// The current source mesh.
    #[must_use]
    pub const fn source(&self) -> Option<&Rc<IndexedMesh>> {
        self.source.as_ref()
    }

    /// Set the source mesh.
    ///
    /// Setting the mesh that is already the source is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BendError::Mesh`] if the mesh has out-of-range face indices
    /// or normals on only some vertices. The bender is unchanged on error.
    pub fn set_source(&mut self, mesh: Rc<IndexedMesh>) -> BendResult<()> {
        if self.source.as_ref().is_some_and(|s| Rc::ptr_eq(s, &mesh)) {
            return Ok(());
        }
        mesh.validate()?;

        self.source_has_normals = mesh.has_normals();
        self.source_vertices = mesh
            .vertices
            .iter()
            .map(|v| BendVertex {
                position: v.position,
                normal: v.attributes.normal.unwrap_or_else(Vector3::zeros),
            })
            .collect();
        debug!(
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            normals = self.source_has_normals,
            "bend source set"
        );
        self.source = Some(mesh);
        self.dirty = true;
        Ok(())
    }

    /// The current curve sampler.
    #[must_use]
    pub const fn curve_sampler(&self) -> Option<&Rc<dyn CurveSampler>> {
        self.curve.as_ref()
    }

    /// Set the curve the source is bent along, subscribing to its changes.
    ///
    /// Setting the curve that is already used is a no-op. Any previous
    /// curve is unsubscribed.
    pub fn set_curve_sampler(&mut self, curve: Rc<dyn CurveSampler>) {
        let same = self
            .curve
            .as_ref()
            .is_some_and(|c| std::ptr::addr_eq(Rc::as_ptr(c), Rc::as_ptr(&curve)));
        if same {
            return;
        }

        self.subscription = None;
        let stale = Rc::downgrade(&self.curve_stale);
        let owner = self.self_handle.clone();
        self.subscription = Some(curve.changes().subscribe(move || {
            let Some(flag) = stale.upgrade() else {
                return;
            };
            flag.set(true);
            if let Some(bender) = owner.as_ref().and_then(Weak::upgrade) {
                recompute_on_curve_change(&bender);
            }
        }));
        debug!(length = curve.length(), "bend curve set");
        self.curve = Some(curve);
        self.dirty = true;
    }

    /// Detach from the current curve and unsubscribe from its changes.
    pub fn clear_curve_sampler(&mut self) {
        if self.curve.is_none() {
            return;
        }
        self.subscription = None;
        self.curve = None;
        self.curve_stale.set(false);
        self.dirty = true;
    }

    /// The current placement.
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Replace the whole placement. Marks dirty only if it differs.
    pub fn set_placement(&mut self, placement: Placement) {
        if self.placement != placement {
            self.placement = placement;
            self.dirty = true;
        }
    }

    /// Set the placement translation. Marks dirty only if it differs.
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        if self.placement.set_translation(translation) {
            self.dirty = true;
        }
    }

    /// Set the placement rotation. Marks dirty only if it differs.
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        if self.placement.set_rotation(rotation) {
            self.dirty = true;
        }
    }

    /// Set the placement scale. `scale.x` is clamped into `[-1, 1]`; marks
    /// dirty only if the clamped value differs.
    pub fn set_scale(&mut self, scale: Vector3<f64>) {
        if self.placement.set_scale(scale) {
            self.dirty = true;
        }
    }

    /// Check if placement data must be rebuilt on the next compute.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if the output is out of date, either because the bender is
    /// dirty or because the curve changed since the last compute.
    #[must_use]
    pub fn needs_compute(&self) -> bool {
        self.dirty || self.curve_stale.get()
    }

    /// Compute if anything changed since the last successful compute.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute`].
    pub fn compute_if_needed(&mut self) -> BendResult<Option<BendStats>> {
        if self.needs_compute() {
            self.compute().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Bend the source along the curve and replace the output mesh.
    ///
    /// # Errors
    ///
    /// - [`BendError::NoSource`] if no source mesh is set
    /// - [`BendError::NoCurve`] if no curve is set
    /// - [`BendError::EmptySource`] if the source has no vertices
    /// - [`BendError::DegenerateExtent`] if the placed source has zero length
    ///   along the bend axis and [`DegenerateExtentPolicy::Fail`] is used
    ///
    /// On error the bender keeps its previous output and dirty state.
    pub fn compute(&mut self) -> BendResult<BendStats> {
        if self.source.is_none() {
            return Err(BendError::NoSource);
        }
        let curve = self.curve.clone().ok_or(BendError::NoCurve)?;

        let fresh = if self.dirty || self.placed.is_none() {
            Some(self.build_data()?)
        } else {
            None
        };
        let Some(data) = fresh.as_ref().or(self.placed.as_ref()) else {
            return Err(BendError::NoSource);
        };

        let (output, mut stats) = self.bend(data, curve.as_ref())?;
        stats.rebuilt = fresh.is_some();

        if let Some(data) = fresh {
            self.placed = Some(data);
        }
        self.output_bounds = output.bounds_opt();
        self.output = Some(output);
        self.dirty = false;
        self.curve_stale.set(false);
        self.revision += 1;

        debug!(
            vertices = stats.vertices_bent,
            queries = stats.curve_queries,
            hits = stats.cache_hits,
            rebuilt = stats.rebuilt,
            revision = self.revision,
            "mesh bent along curve"
        );
        Ok(stats)
    }

    /// The bent mesh from the last successful compute.
    #[must_use]
    pub const fn output(&self) -> Option<&IndexedMesh> {
        self.output.as_ref()
    }

    /// Bounds of the bent mesh, recomputed on every successful compute.
    #[must_use]
    pub const fn output_bounds(&self) -> Option<Aabb> {
        self.output_bounds
    }

    /// Number of successful computes. Increases by one each time the
    /// output is replaced.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Bend-axis extent measured by the last placement rebuild.
    #[must_use]
    pub fn extent(&self) -> Option<BendExtent> {
        self.placed.as_ref().map(|p| p.extent)
    }

    /// Apply the placement to the source and measure its bend-axis extent.
    fn build_data(&self) -> BendResult<PlacedData> {
        let placement = &self.placement;

        let extent = BendExtent::measure(
            self.source_vertices
                .iter()
                .map(|v| placement.position_for_extent(&v.position).x),
        )
        .ok_or(BendError::EmptySource)?;

        let vertices = self
            .source_vertices
            .iter()
            .map(|v| {
                let (position, normal) = placement.transform(&v.position, &v.normal);
                BendVertex { position, normal }
            })
            .collect();

        let winding_reversed = placement.is_mirrored();

        debug!(
            min_x = extent.min_x,
            length = extent.length,
            winding_reversed,
            "bend placement rebuilt"
        );
        Ok(PlacedData {
            vertices,
            extent,
            winding_reversed,
        })
    }

    /// Produce the bent mesh from placed data and the current curve.
    fn bend(
        &self,
        data: &PlacedData,
        curve: &dyn CurveSampler,
    ) -> BendResult<(IndexedMesh, BendStats)> {
        let source = self.source.as_deref().ok_or(BendError::NoSource)?;

        let collapse = data.extent.is_degenerate();
        if collapse {
            match self.params.degenerate_extent {
                DegenerateExtentPolicy::CollapseToStart => {
                    warn!(min_x = data.extent.min_x, "zero bend extent, collapsing to curve start");
                }
                DegenerateExtentPolicy::Fail => {
                    return Err(BendError::DegenerateExtent {
                        min_x: data.extent.min_x,
                    });
                }
            }
        }

        let to_forward = bend_axis_to_forward();
        let mut cache = SampleCache::new(self.params.sample_cache);
        let mut output = IndexedMesh::from_parts(source.vertices.clone(), source.faces.clone());
        if data.winding_reversed {
            output.reverse_winding();
        }

        for (out, vertex) in output.vertices.iter_mut().zip(&data.vertices) {
            let rate = if collapse {
                0.0
            } else {
                data.extent.distance_rate(vertex.position.x)
            };
            let sample = cache.sample(rate, curve);
            let (position, normal) = bend_vertex(vertex, &sample, &to_forward);

            out.position = position;
            if self.source_has_normals {
                out.attributes.normal = Some(normal);
            }
        }

        let stats = BendStats {
            vertices_bent: output.vertices.len(),
            curve_queries: cache.queries(),
            cache_hits: cache.hits(),
            rebuilt: false,
            winding_reversed: data.winding_reversed,
        };
        Ok((output, stats))
    }
}

/// Listener body of a shared bender.
fn recompute_on_curve_change(bender: &RefCell<MeshBender>) {
    let Ok(mut bender) = bender.try_borrow_mut() else {
        trace!("bender busy, curve change left pending");
        return;
    };
    match bender.compute_if_needed() {
        Ok(_) => {}
        Err(err) if err.is_precondition() => {
            trace!(%err, "curve changed before bender was ready");
        }
        Err(err) => warn!(%err, "recompute after curve change failed"),
    }
}
