//! Load -> rank -> export, through real files.

use std::fs;

use linkrank::{
    load_adjlist, pagerank, random_surfer, ranking, save_csv, RankConfig, RankReport,
};

const TINY: &str = "\
# tiny web graph
0 1 2
1 2
2 0 3
3
4 0 0 0
";

#[test]
fn adjlist_to_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.txt");
    fs::write(&input, TINY).unwrap();

    let graph = load_adjlist(&input).unwrap();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 6);
    let dangling: Vec<_> = graph.dangling_nodes().cloned().collect();
    assert_eq!(dangling, vec!["3".to_string()]);

    let config = RankConfig::default().with_seed(17);
    let pr = pagerank(graph.clone(), &config).unwrap();
    let sf = random_surfer(graph, &config).unwrap();

    let pr_csv = dir.path().join("tiny-pagerank.csv");
    let sf_csv = dir.path().join("tiny-randomsurfer.csv");
    save_csv(&pr_csv, &ranking(pr.graph())).unwrap();
    save_csv(&sf_csv, &ranking(sf.graph())).unwrap();

    let text = fs::read_to_string(&pr_csv).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Node,Score"));
    let rows: Vec<(String, f64)> = lines
        .map(|l| {
            let (node, score) = l.split_once(',').unwrap();
            (node.to_string(), score.parse().unwrap())
        })
        .collect();
    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| w[0].1 >= w[1].1));
    let total: f64 = rows.iter().map(|(_, s)| s).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for (node, score) in &rows {
        assert_eq!(pr.graph().weight(node).unwrap(), *score);
    }

    let sf_text = fs::read_to_string(&sf_csv).unwrap();
    let visits: f64 = sf_text
        .lines()
        .skip(1)
        .map(|l| l.split_once(',').unwrap().1.parse::<f64>().unwrap())
        .sum();
    assert_eq!(visits, sf.steps() as f64);

    let report = RankReport::new("tiny.txt", &pr, &sf, config.top_k);
    assert_eq!(report.pagerank_top.len(), 5);
    assert_eq!(report.dangling_count, 1);
}

#[test]
fn config_file_feeds_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rank.toml");
    fs::write(&path, "damping = 0.25\nmax_depth = 3\ntolerance = 1e-15\n").unwrap();
    let config = RankConfig::load(&path).unwrap();

    let graph = linkrank::parse_adjlist(TINY);
    let run = pagerank(graph, &config).unwrap();
    assert_eq!(run.iterations(), 3);
    assert!(!run.converged());
}
