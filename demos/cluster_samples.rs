use ampliclust::{pairwise_table, ClusterConfig, Clustering, HierarchicalClustering, Sample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Usage: cluster_samples [method] [metric]
    //   e.g. cluster_samples flexible-beta(-0.25) euclidean
    //
    // Set RUST_LOG=ampliclust=debug to see one line per agglomeration round.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let method = args.next().unwrap_or_else(|| "average".to_string());
    let metric = args.next().unwrap_or_else(|| "bray-curtis".to_string());
    let config = ClusterConfig {
        method: method.parse()?,
        metric: metric.parse()?,
        ..ClusterConfig::default()
    };

    // Phylotype counts for two soil and three gut communities.
    let samples = vec![
        Sample::new("soil_2", vec![40.0, 31.0, 2.0, 0.0, 5.0]).with_style("soil"),
        Sample::new("gut_10", vec![1.0, 0.0, 55.0, 38.0, 4.0]).with_style("gut"),
        Sample::new("soil_1", vec![35.0, 28.0, 0.0, 1.0, 9.0]).with_style("soil"),
        Sample::new("gut_2", vec![0.0, 2.0, 61.0, 30.0, 1.0]).with_style("gut"),
        Sample::new("gut_1", vec![3.0, 1.0, 47.0, 44.0, 0.0]).with_style("gut"),
    ];

    let table = pairwise_table(&samples, config.metric)?;
    println!("{}:", config.metric.label());
    for (label, row) in table.rows() {
        let cells: Vec<String> = row.iter().map(|d| format!("{d:.3}")).collect();
        println!("  {label:>8} {}", cells.join(" "));
    }

    let engine = HierarchicalClustering::from_config(config).with_n_clusters(2);
    let tree = engine.fit_tree(&samples)?;
    println!("axis: {}", tree.axis_label());
    println!("tree: {}", tree.root());
    println!("leaves: {:?}", tree.labels());
    println!("rounds: {}", tree.history().rounds());

    for placement in tree.layout().leaves() {
        let leaf = &samples[placement.leaf_index];
        println!("  row {:>2}: {} {:?}", placement.y, leaf.label, leaf.style);
    }

    let groups = engine.fit_predict(&samples)?;
    println!("two groups: {groups:?}");

    Ok(())
}
