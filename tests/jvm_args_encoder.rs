//! Integration tests for the JVM argument encoder.

use gatling_events::args::{
    classify, encode, encode_outcome, flag_rules, Denylist, EncodeOptions, FlagFamily,
};

fn raw_args(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

fn encode_default(args: &[String]) -> gatling_events::args::ConfigMap {
    encode(args, &EncodeOptions::default())
}

/// The flag shapes seen in real launcher configurations.
fn mixed_jvm_args() -> Vec<String> {
    raw_args(vec![
        "-Xms1g",
        "-Xmx2g",
        "-Xss10k",
        "-XX:-UseSerialGC",
        "-XX:PreBlockSpin=10",
        "-XX:HeapDumpPath=./java_pid1234.hprof",
        "-javaagent:/full/path/to/agent.jar",
        "-Dthis.is.a.system.property=as-Defined-by-user",
        "-Xthr:minimizeUserCPU",
        "-Xbootclasspath/a",
        "-Xnolinenumbers",
        "-XX:StartFlightRecording=duration=60s,filename=c:\\temp\\myrecording.jfr",
        "-Xlog:gc*=debug:stdout",
        "-Xlog:gc*=debug:file=/tmp/gc.log",
        "-Xloggc:/home/user/log/gc.log",
        "-d32",
        "-server",
        "-XX:OnOutOfMemoryError=/bin/date; /bin/echo custom message;/bin/kill -9 %p",
        "-XX:SomeDoubleEqualsProp=/bin/date=123341",
        "option=test",
        "-DmyPassword=s3cr3t",
        "-DmyToken=s3cr3t",
    ])
}

// =============================================================================
// FIXTURE TESTS
// =============================================================================

#[test]
fn encodes_every_flag_shape() {
    let args = mixed_jvm_args();
    let map = encode_default(&args);

    let expected = [
        ("jmvArg.Xms", "1g"),
        ("jmvArg.Xmx", "2g"),
        ("jmvArg.Xss", "10k"),
        ("jmvArg.XXUseSerialGC", "-UseSerialGC"),
        ("jmvArg.XXPreBlockSpin", "10"),
        ("jmvArg.XXHeapDumpPath", "./java_pid1234.hprof"),
        ("jmvArg.javaagent", "/full/path/to/agent.jar"),
        ("jmvArg.Dthis.is.a.system.property", "as-Defined-by-user"),
        ("jmvArg.Xthr", "minimizeUserCPU"),
        ("jmvArg.Xbootclasspatha", ""),
        ("jmvArg.Xnolinenumbers", "nolinenumbers"),
        (
            "jmvArg.XXStartFlightRecording",
            "duration=60s,filename=c:\\temp\\myrecording.jfr",
        ),
        (
            "jmvArg.Xlog",
            "gc*=debug:stdout\ngc*=debug:file=/tmp/gc.log",
        ),
        ("jmvArg.Xloggc", "/home/user/log/gc.log"),
        ("jmvArg.d", "32"),
        ("jmvArg.-server", ""),
        (
            "jmvArg.XXOnOutOfMemoryError",
            "/bin/date; /bin/echo custom message;/bin/kill -9 %p",
        ),
        ("jmvArg.XXSomeDoubleEqualsProp", "/bin/date=123341"),
        ("jmvArg.option", "test"),
    ];

    for (key, value) in expected {
        assert_eq!(map.get(key), Some(value), "key {key}");
    }
    // one merged Xlog entry, two secrets filtered out
    assert_eq!(map.len(), args.len() - 3);
    assert_eq!(map.len(), expected.len());
}

#[test]
fn end_to_end_scenario() {
    let args = raw_args(vec![
        "-Xms1g",
        "-Xmx2g",
        "-Dfoo=bar",
        "-DmyPassword=s3cr3t",
        "-Xlog:gc*=debug:stdout",
        "-Xlog:gc*=debug:file=/tmp/gc.log",
    ]);
    let map = encode_default(&args).into_inner();

    let expected: std::collections::BTreeMap<String, String> = [
        ("jmvArg.Xms", "1g"),
        ("jmvArg.Xmx", "2g"),
        ("jmvArg.Dfoo", "bar"),
        ("jmvArg.Xlog", "gc*=debug:stdout\ngc*=debug:file=/tmp/gc.log"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    assert_eq!(map, expected);
}

// =============================================================================
// LAWS
// =============================================================================

#[test]
fn encoding_is_deterministic() {
    let args = mixed_jvm_args();
    assert_eq!(encode_default(&args), encode_default(&args));
}

#[test]
fn secrets_never_reach_the_output() {
    let args = mixed_jvm_args();
    let map = encode_default(&args);

    assert!(map.get("jmvArg.DmyPassword").is_none());
    assert!(map.get("jmvArg.DmyToken").is_none());
    assert!(map.iter().all(|(k, _)| !k.contains("Password") && !k.contains("Token")));
    assert!(map.values().all(|v| !v.contains("s3cr3t")));
}

#[test]
fn redaction_looks_at_names_not_values() {
    let args = raw_args(vec!["-Dnote=my password is here", "-Dpassword=x", "token=abc"]);
    let map = encode_default(&args);

    assert_eq!(map.get("jmvArg.Dnote"), Some("my password is here"));
    assert_eq!(map.len(), 1);
}

#[test]
fn redaction_is_case_sensitive() {
    let args = raw_args(vec!["-DPASSWORD=x", "-Dpassword=y"]);
    let map = encode_default(&args);

    assert_eq!(map.get("jmvArg.DPASSWORD"), Some("x"));
    assert!(!map.contains_key("jmvArg.Dpassword"));
}

#[test]
fn merge_keeps_input_order() {
    let args = raw_args(vec![
        "-Xlog:gc*=debug:file=/tmp/gc.log",
        "-Xlog:gc*=debug:stdout",
        "-Xlog:safepoint",
    ]);
    let map = encode_default(&args);

    assert_eq!(map.len(), 1);
    assert_eq!(
        map.get("jmvArg.Xlog"),
        Some("gc*=debug:file=/tmp/gc.log\ngc*=debug:stdout\nsafepoint")
    );
}

#[test]
fn count_law_holds() {
    let args = raw_args(vec![
        "-Xmx1g",
        "-Xmx2g",
        "-javaagent:/a.jar",
        "-javaagent:/b.jar",
        "-DapiToken=abc",
        "-Dfoo=bar",
        "-server",
        "-server",
    ]);
    let outcome = encode_outcome(&args, &EncodeOptions::default());

    assert_eq!(outcome.redacted, 1);
    assert_eq!(outcome.merged, 3);
    assert_eq!(
        outcome.map.len(),
        args.len() - outcome.redacted - outcome.merged
    );
    assert_eq!(outcome.map.get("jmvArg.javaagent"), Some("/a.jar\n/b.jar"));
    assert_eq!(outcome.map.get("jmvArg.-server"), Some("\n"));
}

#[test]
fn only_first_equals_splits() {
    let args = raw_args(vec![
        "-XX:SomeDoubleEqualsProp=/bin/date=123341",
        "-Da=b=c",
        "k=v=w",
    ]);
    let map = encode_default(&args);

    assert_eq!(map.get("jmvArg.XXSomeDoubleEqualsProp"), Some("/bin/date=123341"));
    assert_eq!(map.get("jmvArg.Da"), Some("b=c"));
    assert_eq!(map.get("jmvArg.k"), Some("v=w"));
}

#[test]
fn bootclasspath_sub_forms_do_not_collide() {
    let args = raw_args(vec![
        "-Xbootclasspath/a:A",
        "-Xbootclasspath/p:B",
        "-Xbootclasspath:C",
    ]);
    let map = encode_default(&args);

    assert_eq!(map.len(), 3);
    assert_eq!(map.get("jmvArg.Xbootclasspatha"), Some("A"));
    assert_eq!(map.get("jmvArg.Xbootclasspathp"), Some("B"));
    assert_eq!(map.get("jmvArg.Xbootclasspath"), Some("C"));
}

#[test]
fn never_panics_on_odd_input() {
    let args = raw_args(vec![
        "", "-", "-X", "-XX:", "-D", "-D=", "=", "=x", "-d", "-dx", "-javaagent:", "é=ü", "-Xé",
    ]);
    let map = encode_default(&args);
    assert!(!map.is_empty());
}

// =============================================================================
// OPTIONS
// =============================================================================

#[test]
fn custom_prefix_is_applied() {
    let options = EncodeOptions {
        namespace_prefix: "jvm.".to_string(),
        ..EncodeOptions::default()
    };
    let map = encode(&["-Xmx2g"], &options);
    assert_eq!(map.get("jvm.Xmx"), Some("2g"));
}

#[test]
fn extended_denylist_redacts_more() {
    let options = EncodeOptions {
        denylist: Denylist::default().with_entry("secret"),
        ..EncodeOptions::default()
    };
    let map = encode(&["-Dsecret.key=abc", "-Dfoo=bar"], &options);
    assert_eq!(map.len(), 1);
    assert!(map.contains_key("jmvArg.Dfoo"));
}

#[test]
fn empty_denylist_keeps_everything() {
    let options = EncodeOptions {
        denylist: Denylist::empty(),
        ..EncodeOptions::default()
    };
    let map = encode(&["-DmyPassword=s3cr3t"], &options);
    assert_eq!(map.get("jmvArg.DmyPassword"), Some("s3cr3t"));
}

#[test]
fn serializes_as_flat_object() {
    let map = encode(&["-Xmx2g", "-Dfoo=bar"], &EncodeOptions::default());
    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"jmvArg.Dfoo": "bar", "jmvArg.Xmx": "2g"})
    );
}

// =============================================================================
// CLASSIFIER TESTS
// =============================================================================

#[test]
fn classify_families() {
    let rules = flag_rules();
    let cases = [
        ("-XX:+UseG1GC", FlagFamily::Extended, "XXUseG1GC", "+UseG1GC"),
        ("-XX:MaxInlineLevel=20", FlagFamily::Extended, "XXMaxInlineLevel", "20"),
        ("-Xbootclasspath/p:x.jar", FlagFamily::BootClassPath, "Xbootclasspathp", "x.jar"),
        ("-Xmn512m", FlagFamily::ShortX, "Xmn", "512m"),
        ("-Xmixed", FlagFamily::ShortX, "Xmixed", "mixed"),
        ("-Xshare:off", FlagFamily::ShortX, "Xshare", "off"),
        ("-Dfoo", FlagFamily::SystemProperty, "Dfoo", ""),
        ("-javaagent:agent.jar=opt", FlagFamily::JavaAgent, "javaagent", "agent.jar=opt"),
        ("-d64", FlagFamily::DataModel, "d", "64"),
        ("key=value", FlagFamily::Bare, "key", "value"),
        ("-dsa", FlagFamily::Unrecognized, "-dsa", ""),
        ("-ea", FlagFamily::Unrecognized, "-ea", ""),
    ];

    for (raw, family, suffix, value) in cases {
        let flag = classify(raw, &rules);
        assert_eq!(flag.family, family, "{raw}");
        assert_eq!(flag.suffix, suffix, "{raw}");
        assert_eq!(flag.value, value, "{raw}");
    }
}

#[test]
fn classify_decodes_names_for_redaction() {
    let rules = flag_rules();
    assert_eq!(classify("-DmyPassword=s3cr3t", &rules).name, "myPassword");
    assert_eq!(classify("-XX:-UseSerialGC", &rules).name, "UseSerialGC");
    assert_eq!(classify("apiToken=x", &rules).name, "apiToken");
}
