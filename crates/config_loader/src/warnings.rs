//! 非致命配置告警
//!
//! 这些组合可以运行，但多半不是操作者想要的结果。

use contracts::RunProfile;

/// 收集配置告警，按固定顺序返回
pub fn collect(profile: &RunProfile) -> Vec<String> {
    let mut warnings = Vec::new();
    let frame = profile.frame();

    if !profile.lib.has_ingestion_client() {
        warnings.push(format!(
            "lib '{}' has no ingestion client; the ingestion stage will fail",
            profile.lib
        ));
    }

    if !frame.supports_search() {
        warnings.push(format!(
            "frame '{frame}' is not supported by the memory search step"
        ));
    }

    if frame != profile.lib {
        warnings.push(format!(
            "frame '{frame}' differs from lib '{}'; memories are ingested and searched in different systems",
            profile.lib
        ));
    }

    if frame.is_memos() && profile.service.url.is_none() {
        warnings.push(format!(
            "frame '{frame}' expects a service URL but none is configured"
        ));
    }

    if profile.variant.run_ids && profile.variant.allow_overwrite {
        warnings.push(
            "run_ids with allow_overwrite regenerates only the listed ids and overwrites their results"
                .to_string(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::MemoryLib;

    #[test]
    fn test_clean_profile_has_no_warnings() {
        let profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        assert!(collect(&profile).is_empty());
    }

    #[test]
    fn test_mem0_graph_warns_twice() {
        let profile = RunProfile::new(MemoryLib::Mem0Graph, "gpt-4o-mini");
        let warnings = collect(&profile);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no ingestion client"));
        assert!(warnings[1].contains("memory search"));
    }

    #[test]
    fn test_frame_mismatch() {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        profile.frame = Some(MemoryLib::Supermemory);
        let warnings = collect(&profile);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("differs from lib"));
    }

    #[test]
    fn test_memos_without_url() {
        let mut profile = RunProfile::new(MemoryLib::MemosApi, "gpt-4o-mini");
        assert!(collect(&profile)
            .iter()
            .any(|w| w.contains("expects a service URL")));

        profile.service.url = Some("http://127.0.0.1:8001".to_string());
        assert!(collect(&profile).is_empty());
    }

    #[test]
    fn test_run_ids_with_allow_overwrite() {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        profile.variant.run_ids = true;
        assert!(collect(&profile).is_empty());

        profile.variant.allow_overwrite = true;
        assert_eq!(collect(&profile).len(), 1);
    }
}
