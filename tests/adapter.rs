//! End-to-end tests driving the basis curves adapter through a host-like
//! populate / probe / update sequence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use curves_imaging::core::{DirtyBits, Interpolation, PrimPath, TimeCode, Value};
use curves_imaging::imaging::{
    attr, AdapterSettings, AttributeReader, BasisCurvesAdapter, CurveBasis, MemoryStage, Phase,
    PrimAdapter, RenderIndexProxy, RprimType, ValueCache, VaryingTag,
};
use curves_imaging::util::Vec3;

/// Reader that counts calls before forwarding to a stage.
struct CountingReader {
    stage: MemoryStage,
    reads: AtomicUsize,
    varying_queries: AtomicUsize,
}

impl CountingReader {
    fn new(stage: MemoryStage) -> Self {
        Self {
            stage,
            reads: AtomicUsize::new(0),
            varying_queries: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn varying_queries(&self) -> usize {
        self.varying_queries.load(Ordering::SeqCst)
    }
}

impl AttributeReader for CountingReader {
    fn read(&self, path: &PrimPath, attribute: &str, time: TimeCode) -> Option<Value> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.stage.read(path, attribute, time)
    }

    fn is_time_varying(&self, path: &PrimPath, attribute: &str) -> bool {
        self.varying_queries.fetch_add(1, Ordering::SeqCst);
        self.stage.is_time_varying(path, attribute)
    }
}

fn path(s: &str) -> PrimPath {
    PrimPath::new(s).unwrap()
}

/// Two cubic bezier curves with animated points.
fn hair_stage(p: &PrimPath) -> MemoryStage {
    let mut stage = MemoryStage::new();
    stage
        .set_default(p, "basis", "bezier")
        .set_default(p, "type", "cubic")
        .set_default(p, "wrap", "nonperiodic")
        .set_default(p, attr::CURVE_VERTEX_COUNTS, vec![4i32, 4])
        .set_sample(p, attr::POINTS, 1.0, vec![Vec3::ZERO; 8])
        .set_sample(p, attr::POINTS, 2.0, vec![Vec3::ONE; 8]);
    stage
}

#[test]
fn test_full_lifecycle() {
    let p = path("/World/hair");
    let cache = Arc::new(ValueCache::new());
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::clone(&cache));
    let index = RenderIndexProxy::accepting_all();

    let cache_path = adapter.populate(&p, &index).unwrap();
    assert_eq!(cache_path, p);
    let inserted = index.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].rprim_type, RprimType::BasisCurves);
    assert!(inserted[0].binding.is_unbound());

    adapter.prepare_variability(&p, DirtyBits::ALL_CURVES);
    let varying = adapter.probe_variability(&p, DirtyBits::ALL_CURVES);
    assert_eq!(varying, DirtyBits::POINTS);
    assert_eq!(adapter.phase(&p), Phase::VariabilityProbed);

    let requested = DirtyBits::POINTS | DirtyBits::TOPOLOGY | DirtyBits::WIDTHS | DirtyBits::NORMALS;
    adapter.prepare_frame(&p, &cache_path, TimeCode::Time(1.0), requested);
    let result = adapter.update_frame(&p, &cache_path, TimeCode::Time(1.0), requested);
    assert_eq!(result, DirtyBits::POINTS | DirtyBits::TOPOLOGY | DirtyBits::WIDTHS);

    let entry = cache.snapshot(&cache_path).unwrap();
    assert_eq!(entry.points.as_ref().unwrap().len(), 8);
    let topology = entry.topology.as_ref().unwrap();
    assert_eq!(topology.basis, CurveBasis::Bezier);
    assert_eq!(topology.curve_vertex_counts, vec![4, 4]);
    assert_eq!(entry.widths, Some(vec![1.0]));
    assert!(entry.normals.is_none());
    assert_eq!(entry.primvars.names(), vec!["points", "widths"]);

    let result = adapter.update_frame(&p, &p, TimeCode::Time(2.0), DirtyBits::POINTS);
    assert_eq!(result, DirtyBits::POINTS);
    let entry = cache.snapshot(&cache_path).unwrap();
    assert_eq!(entry.points.unwrap()[0], Vec3::ONE);
}

#[test]
fn test_populate_reads_material_binding() {
    let p = path("/World/hair");
    let mut stage = hair_stage(&p);
    stage.set_default(&p, attr::MATERIAL_BINDING, "/Looks/hairMat");
    let adapter = BasisCurvesAdapter::new(stage, Arc::new(ValueCache::new()));
    let index = RenderIndexProxy::accepting_all();
    adapter.populate(&p, &index);
    assert_eq!(index.inserted()[0].binding.material, Some(path("/Looks/hairMat")));
}

#[test]
fn test_populate_rejected_by_index() {
    let p = path("/World/hair");
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::new(ValueCache::new()));
    let index = RenderIndexProxy::new(vec![RprimType::Mesh]);
    assert!(!BasisCurvesAdapter::<MemoryStage>::is_supported(&index));
    assert!(adapter.populate(&p, &index).is_none());
    assert!(index.is_empty());
}

#[test]
fn test_probe_runs_once_per_attribute() {
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));

    let requested = DirtyBits::POINTS | DirtyBits::TOPOLOGY | DirtyBits::WIDTHS | DirtyBits::NORMALS;
    let first = adapter.probe_variability(&p, requested);
    let queries = reader.varying_queries();
    assert_eq!(queries, 4);

    let second = adapter.probe_variability(&p, requested);
    assert_eq!(first, second);
    assert_eq!(reader.varying_queries(), queries);
    assert_eq!(reader.reads(), 0);

    // Only the newly requested channel is probed.
    adapter.probe_variability(&p, requested | DirtyBits::WIDTHS | DirtyBits::PRIMVAR);
    assert_eq!(reader.varying_queries(), queries + 1);
    assert_eq!(adapter.variability(&p).len(), 5);
}

#[test]
fn test_variability_records() {
    let p = path("/World/hair");
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::new(ValueCache::new()));
    adapter.probe_variability(&p, DirtyBits::POINTS | DirtyBits::TOPOLOGY);

    let records = adapter.variability(&p);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].attribute, attr::POINTS);
    assert!(records[0].varying);
    assert_eq!(records[0].tag, VaryingTag::PrimVar);
    assert_eq!(records[1].tag, VaryingTag::Topology);
    assert!(!records[1].varying);
    assert_eq!(adapter.varying_bits(&p), DirtyBits::POINTS);
}

#[test]
fn test_static_channels_not_reread() {
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));
    adapter.probe_variability(&p, DirtyBits::TOPOLOGY | DirtyBits::WIDTHS);

    let requested = DirtyBits::TOPOLOGY | DirtyBits::WIDTHS;
    assert_eq!(adapter.update_frame(&p, &p, TimeCode::Time(1.0), requested), requested);
    let reads = reader.reads();
    assert!(reads > 0);

    assert_eq!(adapter.update_frame(&p, &p, TimeCode::Time(2.0), requested), requested);
    assert_eq!(reader.reads(), reads);
}

#[test]
fn test_static_reuse_can_be_disabled() {
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let settings = AdapterSettings {
        reuse_static_channels: false,
        ..Default::default()
    };
    let adapter =
        BasisCurvesAdapter::with_settings(Arc::clone(&reader), Arc::new(ValueCache::new()), settings);
    adapter.probe_variability(&p, DirtyBits::WIDTHS);

    adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::WIDTHS);
    let reads = reader.reads();
    adapter.update_frame(&p, &p, TimeCode::Time(2.0), DirtyBits::WIDTHS);
    assert!(reader.reads() > reads);
}

#[test]
fn test_uniform_fields_read_once() {
    let p = path("/World/hair");
    let mut stage = hair_stage(&p);
    stage
        .set_sample(&p, attr::CURVE_VERTEX_COUNTS, 1.0, vec![4i32, 4])
        .set_sample(&p, attr::CURVE_VERTEX_COUNTS, 2.0, vec![8i32]);
    let reader = Arc::new(CountingReader::new(stage));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));
    assert_eq!(adapter.probe_variability(&p, DirtyBits::TOPOLOGY), DirtyBits::TOPOLOGY);

    adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::TOPOLOGY);
    // basis, type, wrap and the counts.
    assert_eq!(reader.reads(), 4);
    adapter.update_frame(&p, &p, TimeCode::Time(2.0), DirtyBits::TOPOLOGY);
    // Only the counts again.
    assert_eq!(reader.reads(), 5);

    let entry = adapter.cache().snapshot(&p).unwrap();
    assert_eq!(entry.topology.unwrap().curve_vertex_counts, vec![8]);
}

#[test]
fn test_animated_normals_presence_narrows_result() {
    let p = path("/World/hair");
    let mut stage = hair_stage(&p);
    stage
        .set_sample(&p, attr::NORMALS, 1.0, vec![Vec3::Z; 8])
        .block_sample(&p, attr::NORMALS, 2.0);
    let adapter = BasisCurvesAdapter::new(stage, Arc::new(ValueCache::new()));
    adapter.probe_variability(&p, DirtyBits::ALL_CURVES);

    let requested = DirtyBits::NORMALS | DirtyBits::POINTS;
    let at_1 = adapter.update_frame(&p, &p, TimeCode::Time(1.0), requested);
    assert!(at_1.contains(DirtyBits::NORMALS));
    let entry = adapter.cache().snapshot(&p).unwrap();
    assert_eq!(entry.primvars.get("normals").unwrap().interpolation, Interpolation::Vertex);

    let at_2 = adapter.update_frame(&p, &p, TimeCode::Time(2.0), requested);
    assert!(!at_2.contains(DirtyBits::NORMALS));
    assert!(at_2.contains(DirtyBits::POINTS));
    let entry = adapter.cache().snapshot(&p).unwrap();
    assert!(entry.normals.is_none());
    assert!(entry.primvars.get("normals").is_none());
    assert!(!entry.valid.contains(DirtyBits::NORMALS));
}

#[test]
fn test_result_is_subset_of_request() {
    let p = path("/World/hair");
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::new(ValueCache::new()));
    adapter.probe_variability(&p, DirtyBits::ALL_CURVES);

    let all = DirtyBits::all() | DirtyBits::from_host(1 << 28);
    for bits in [
        DirtyBits::empty(),
        DirtyBits::NORMALS,
        DirtyBits::POINTS | DirtyBits::NORMALS,
        DirtyBits::ALL_CURVES,
        all,
    ] {
        let result = adapter.update_frame(&p, &p, TimeCode::Time(1.0), bits);
        assert!(bits.contains(result), "{:?} not within {:?}", result, bits);
    }
}

#[test]
fn test_update_without_probe() {
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));

    let result = adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::WIDTHS);
    assert_eq!(result, DirtyBits::WIDTHS);
    assert_eq!(adapter.phase(&p), Phase::Uninitialized);

    // Nothing is known static, so the channel is read again.
    let reads = reader.reads();
    adapter.update_frame(&p, &p, TimeCode::Time(2.0), DirtyBits::WIDTHS);
    assert!(reader.reads() > reads);
}

#[test]
fn test_remove_subtree_forces_reprobe() {
    let root = path("/World");
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));

    adapter.probe_variability(&p, DirtyBits::POINTS);
    adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::POINTS);
    assert_eq!(adapter.cache().len(), 1);

    assert_eq!(adapter.remove_subtree(&root), 1);
    assert!(adapter.cache().is_empty());
    assert_eq!(adapter.phase(&p), Phase::Uninitialized);

    let queries = reader.varying_queries();
    adapter.probe_variability(&p, DirtyBits::POINTS);
    assert_eq!(reader.varying_queries(), queries + 1);
}

#[test]
fn test_transform_and_visibility_channels() {
    let world = path("/World");
    let p = path("/World/hair");
    let mut stage = hair_stage(&p);
    stage
        .set_sample(&world, attr::TRANSFORM, 1.0, curves_imaging::util::Mat4::IDENTITY)
        .set_sample(
            &world,
            attr::TRANSFORM,
            2.0,
            curves_imaging::util::Mat4::from_translation(Vec3::Y),
        )
        .set_default(&world, attr::VISIBILITY, "invisible");
    let adapter = BasisCurvesAdapter::new(stage, Arc::new(ValueCache::new()));

    let varying = adapter.probe_variability(&p, DirtyBits::TRANSFORM | DirtyBits::VISIBILITY);
    assert_eq!(varying, DirtyBits::TRANSFORM);

    let requested = DirtyBits::TRANSFORM | DirtyBits::VISIBILITY;
    assert_eq!(adapter.update_frame(&p, &p, TimeCode::Time(2.0), requested), requested);
    let entry = adapter.cache().snapshot(&p).unwrap();
    assert_eq!(entry.transform.unwrap().transform_point3(Vec3::ZERO), Vec3::Y);
    assert_eq!(entry.visible, Some(false));
}

#[test]
fn test_display_color_primvar() {
    let p = path("/World/hair");
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::new(ValueCache::new()));
    adapter.probe_variability(&p, DirtyBits::ALL_CURVES);

    let result = adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::PRIMVAR | DirtyBits::WIDTHS);
    assert_eq!(result, DirtyBits::PRIMVAR | DirtyBits::WIDTHS);
    let entry = adapter.cache().snapshot(&p).unwrap();
    assert_eq!(entry.display_color, Some(vec![Vec3::splat(0.5)]));
    // Primvars keep first-insertion order: channels run lowest bit first.
    assert_eq!(entry.primvars.names(), vec!["widths", "displayColor"]);
}

#[test]
fn test_parallel_batch_update() {
    let mut stage = MemoryStage::new();
    let paths: Vec<PrimPath> = (0..200).map(|i| path(&format!("/World/c{}", i))).collect();
    for (i, p) in paths.iter().enumerate() {
        stage
            .set_default(p, attr::CURVE_VERTEX_COUNTS, vec![2i32])
            .set_default(p, attr::POINTS, vec![Vec3::splat(i as f32); 2]);
        if i % 2 == 0 {
            stage.set_default(p, attr::NORMALS, vec![Vec3::Z; 2]);
        }
    }

    let settings = AdapterSettings {
        parallel_threshold: 16,
        ..Default::default()
    };
    let adapter = BasisCurvesAdapter::with_settings(stage, Arc::new(ValueCache::new()), settings);
    let requested = DirtyBits::POINTS | DirtyBits::TOPOLOGY | DirtyBits::NORMALS;
    for p in &paths {
        adapter.probe_variability(p, requested);
    }

    let batch: Vec<_> = paths.iter().map(|p| (p.clone(), p.clone(), requested)).collect();
    let results = adapter.update_frames(&batch, TimeCode::Time(1.0));

    assert_eq!(results.len(), paths.len());
    for (i, (p, result)) in paths.iter().zip(&results).enumerate() {
        assert_eq!(result.contains(DirtyBits::NORMALS), i % 2 == 0, "{}", p);
        let entry = adapter.cache().snapshot(p).unwrap();
        assert_eq!(entry.points.unwrap()[0], Vec3::splat(i as f32));
    }
    assert_eq!(adapter.cache().len(), paths.len());
}

#[test]
fn test_separate_cache_path() {
    let p = path("/World/hair");
    let cache_path = path("/Render/hair_proto");
    let cache = Arc::new(ValueCache::new());
    let adapter = BasisCurvesAdapter::new(hair_stage(&p), Arc::clone(&cache));
    adapter.probe_variability(&p, DirtyBits::ALL_CURVES);

    let requested = DirtyBits::POINTS | DirtyBits::WIDTHS;
    adapter.prepare_frame(&p, &cache_path, TimeCode::Time(2.0), requested);
    let batch = vec![(p.clone(), cache_path.clone(), requested)];
    assert_eq!(adapter.update_frames(&batch, TimeCode::Time(2.0)), vec![requested]);

    assert!(cache.get(&p).is_none());
    let entry = cache.snapshot(&cache_path).unwrap();
    assert_eq!(entry.points.unwrap()[0], Vec3::ONE);
    assert_eq!(entry.primvars.names(), vec!["points", "widths"]);
    assert_eq!(cache.paths(), vec![cache_path]);
}

#[test]
fn test_static_absent_channel_not_reread() {
    let p = path("/World/hair");
    let reader = Arc::new(CountingReader::new(hair_stage(&p)));
    let adapter = BasisCurvesAdapter::new(Arc::clone(&reader), Arc::new(ValueCache::new()));
    assert!(adapter.probe_variability(&p, DirtyBits::NORMALS).is_empty());

    let result = adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::NORMALS);
    assert!(result.is_empty());
    let reads = reader.reads();
    assert_eq!(reads, 1);

    for frame in 2..5 {
        let result = adapter.update_frame(&p, &p, TimeCode::Time(frame as f64), DirtyBits::NORMALS);
        assert!(result.is_empty());
    }
    assert_eq!(reader.reads(), reads);

    // A fresh probe forgets the absence.
    adapter.remove_subtree(&p);
    adapter.probe_variability(&p, DirtyBits::NORMALS);
    adapter.update_frame(&p, &p, TimeCode::Time(1.0), DirtyBits::NORMALS);
    assert_eq!(reader.reads(), reads + 1);
}
