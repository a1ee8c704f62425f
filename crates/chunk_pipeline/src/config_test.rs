use super::*;

#[test]
fn test_defaults() {
  let config = GeneratorConfig::default();
  assert_eq!(config.process_iters, 2);
  assert_eq!(config.topology, MeshTopology::Triangles);
  assert_eq!(config.regeneration, RegenerationPolicy::Always);
  assert!(config.arena_capacity > 0);
}

#[test]
fn test_builders_chain() {
  let config = GeneratorConfig::default()
    .with_process_iters(0)
    .with_topology(MeshTopology::Quads)
    .with_smooth_normals(false)
    .with_arena_capacity(8)
    .with_worker_threads(2)
    .with_regeneration(RegenerationPolicy::SplitAware)
    .with_gpu_budget(100, 300);

  assert_eq!(config.process_iters, 0);
  assert_eq!(config.topology, MeshTopology::Quads);
  assert!(!config.smooth_normals);
  assert_eq!(config.arena_capacity, 8);
  assert_eq!(config.worker_threads, 2);
  assert_eq!(config.regeneration, RegenerationPolicy::SplitAware);
  assert_eq!(config.gpu_vertex_budget, 100);
  assert_eq!(config.gpu_index_budget, 300);
}

#[test]
fn test_smoothing_factor_clamped() {
  let settings = OptimizerSettings::default().with_smoothing_factor(3.0);
  assert_eq!(settings.smoothing_factor, 1.0);

  let settings = OptimizerSettings::default().with_smoothing_factor(-1.0);
  assert_eq!(settings.smoothing_factor, 0.0);
}
