//! Tests for rc-output.

#[cfg(test)]
mod fixtures {
    use rc_core::{EdgeKey, GeoPoint, NodeId, Point};
    use rc_network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
    use rc_traffic::TrafficMap;

    /// Three nodes in a projected frame with preserved geographic points.
    /// Edge 0→1 has an explicit polyline, name and class; 1→2 has nothing.
    pub fn projected() -> (RoadGraph, TrafficMap) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_projected_node(Point::new(0.0, 0.0), GeoPoint::new(-6.20, 106.80));
        let n1 = b.add_projected_node(Point::new(100.0, 0.0), GeoPoint::new(-6.20, 106.81));
        let n2 = b.add_projected_node(Point::new(100.0, 100.0), GeoPoint::new(-6.19, 106.81));
        b.add_directed_edge(
            n0,
            n1,
            EdgeAttrs {
                length:   Some(100.0),
                highway:  Some("primary".into()),
                name:     Some("Jalan Sudirman".into()),
                geometry: Some(vec![
                    Point::new(106.80, -6.20),
                    Point::new(106.805, -6.201),
                    Point::new(106.81, -6.20),
                ]),
            },
        );
        b.add_directed_edge(n1, n2, EdgeAttrs::default());
        let net = b.build();

        let mut traffic = TrafficMap::new();
        traffic.insert(EdgeKey::first(NodeId(0), NodeId(1)), 400);
        (net, traffic)
    }
}

// ── GeoJSON ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geojson_tests {
    use rc_network::{build_grid, GridSpec};
    use rc_traffic::TrafficMap;

    use super::fixtures::projected;
    use crate::geojson::{to_features, FeatureStyle, Geometry, Properties};

    #[test]
    fn one_line_per_edge_then_one_point_per_node() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        assert_eq!(fc.features.len(), 2 + 3);
        assert_eq!(fc.edge_features().count(), 2);
        assert_eq!(fc.node_count(), 3);
        assert!(matches!(fc.features[0].geometry, Geometry::LineString { .. }));
        assert!(matches!(fc.features[4].geometry, Geometry::Point { .. }));
    }

    #[test]
    fn explicit_geometry_and_attributes_are_used() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        let (geom, props) = fc.edge_features().next().unwrap();
        let Geometry::LineString { coordinates } = geom else { panic!("expected line") };
        assert_eq!(coordinates.len(), 3);
        assert_eq!(props.name, "Jalan Sudirman");
        assert_eq!(props.highway, "primary");
        assert_eq!(props.traffic, 400);
        assert_eq!(props.width, 3.0);
    }

    #[test]
    fn defaults_for_bare_edges() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        let (geom, props) = fc.edge_features().nth(1).unwrap();
        assert_eq!((props.u, props.v, props.key), (1, 2, 0));
        assert_eq!(props.name, "Road 1-2");
        assert_eq!(props.highway, "road");
        assert_eq!(props.traffic, 0);
        assert_eq!(props.width, 1.0);
        // Endpoints use the preserved geographic point, not the projected one.
        let Geometry::LineString { coordinates } = geom else { panic!("expected line") };
        assert_eq!(coordinates, &vec![[106.81, -6.20], [106.81, -6.19]]);
    }

    #[test]
    fn coordinates_are_lon_lat() {
        let spec = GridSpec::default();
        let net = build_grid(&spec);
        let fc = to_features(&net, &TrafficMap::new(), &FeatureStyle::default());
        for (geom, _) in fc.edge_features() {
            let Geometry::LineString { coordinates } = geom else { panic!("expected line") };
            for [x, y] in coordinates {
                // Jakarta: longitude ≈ 106.8, latitude ≈ −6.2.
                assert!((x - 106.8456).abs() < 0.01, "x = {x}");
                assert!((y + 6.2088).abs() < 0.01, "y = {y}");
            }
        }
    }

    #[test]
    fn nodes_elided_above_limit() {
        let (net, traffic) = projected();
        let style = FeatureStyle { node_limit: 2, ..FeatureStyle::default() };
        let fc = to_features(&net, &traffic, &style);
        assert_eq!(fc.node_count(), 0);
        assert_eq!(fc.features.len(), 2);

        let style = FeatureStyle { node_limit: 3, ..FeatureStyle::default() };
        assert_eq!(to_features(&net, &traffic, &style).node_count(), 3);
    }

    #[test]
    fn serialised_shape() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        let json = serde_json::to_value(&fc).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        let first = &json["features"][0];
        assert_eq!(first["type"], "Feature");
        assert_eq!(first["geometry"]["type"], "LineString");
        assert_eq!(first["properties"]["u"], 0);
        assert_eq!(first["properties"]["traffic"], 400);

        let node = &json["features"][2];
        assert_eq!(node["geometry"]["type"], "Point");
        assert_eq!(node["properties"]["type"], "node");
        assert_eq!(node["properties"]["id"], 0);
        assert_eq!(node["geometry"]["coordinates"][0], 106.80);
    }

    #[test]
    fn json_parses_back() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        let text = serde_json::to_string(&fc).unwrap();
        let back: crate::FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(back.features.len(), fc.features.len());
        let (_, props) = back.edge_features().next().unwrap();
        assert_eq!(props.name, "Jalan Sudirman");
        assert_eq!(props.traffic, 400);
        assert!(matches!(back.features[2].properties, Properties::Node(_)));
    }

    #[test]
    fn style_deserialises_with_defaults() {
        let style: FeatureStyle = serde_json::from_str(r#"{ "width_divisor": 100.0 }"#).unwrap();
        assert_eq!(style.base_width, 1.0);
        assert_eq!(style.node_limit, 1000);
        assert_eq!(style.width(300), 4.0);
    }

    #[test]
    fn write_geojson_file() {
        let (net, traffic) = projected();
        let fc = to_features(&net, &traffic, &FeatureStyle::default());
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.geojson");
        crate::write_geojson(&path, &fc).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: crate::FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(back.features.len(), fc.features.len());
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use rc_core::{EdgeKey, NodeId};
    use rc_network::DijkstraRouter;
    use rc_traffic::{close_and_redistribute, TrafficMap};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{ClosureRow, TrafficRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_rows(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("edge_traffic.csv").exists());
        assert!(dir.path().join("closures.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (h1, _) = read_rows(&dir, "edge_traffic.csv");
        assert_eq!(h1, ["u", "v", "key", "traffic"]);
        let (h2, _) = read_rows(&dir, "closures.csv");
        assert_eq!(h2, ["u", "v", "key", "edge_removed", "closed_volume", "outcome", "path_edges"]);
    }

    #[test]
    fn traffic_rows_in_key_order() {
        let mut map = TrafficMap::new();
        map.insert(EdgeKey::new(NodeId(2), NodeId(1), 1), 30);
        map.insert(EdgeKey::first(NodeId(0), NodeId(1)), 10);
        map.insert(EdgeKey::first(NodeId(2), NodeId(1)), 20);

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_traffic(&TrafficRow::from_map(&map)).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_rows(&dir, "edge_traffic.csv");
        let flat: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().collect()).collect();
        assert_eq!(
            flat,
            vec![
                vec!["0", "1", "0", "10"],
                vec!["2", "1", "0", "20"],
                vec!["2", "1", "1", "30"],
            ]
        );
    }

    #[test]
    fn closure_row_from_outcome() {
        let (net, traffic) = super::fixtures::projected();
        // 0→1 has no alternative in the fixture: volume is dropped.
        let out = close_and_redistribute(&net, &traffic, EdgeKey::first(NodeId(0), NodeId(1)), &DijkstraRouter)
            .unwrap();
        let row = ClosureRow::from(&out);
        assert_eq!((row.u, row.v, row.key), (0, 1, 0));
        assert!(row.edge_removed);
        assert_eq!(row.closed_volume, 400);
        assert_eq!(row.outcome, "dropped");
        assert_eq!(row.path_edges, 0);

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_closure(&row).unwrap();
        w.finish().unwrap();
        let (_, rows) = read_rows(&dir, "closures.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][5], "dropped");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_traffic(&[]).unwrap();
    }
}
