//! JSON bodies shared by unit tests.

pub(crate) fn paged_body<S: AsRef<str>>(resources: &[S], next: Option<&str>) -> String {
    let next = match next {
        Some(href) => format!(r#"{{"href":"{}"}}"#, href),
        None => "null".to_string(),
    };
    format!(
        r#"{{"pagination":{{"total_results":{},"total_pages":1,"first":null,"last":null,"next":{},"previous":null}},"resources":[{}]}}"#,
        resources.len(),
        next,
        resources
            .iter()
            .map(|r| r.as_ref())
            .collect::<Vec<_>>()
            .join(",")
    )
}

pub(crate) fn build_json(guid: &str, state: &str) -> String {
    format!(
        r#"{{
        "guid": "{guid}",
        "created_at": "2016-03-28T23:39:34Z",
        "updated_at": "2016-06-08T16:41:26Z",
        "created_by": {{
            "guid": "3cb4e243-bed4-49d5-8739-f8b45abdec1c",
            "name": "bill",
            "email": "bill@example.com"
        }},
        "state": "{state}",
        "staging_memory_in_mb": 1024,
        "staging_disk_in_mb": 1024,
        "staging_log_rate_limit_bytes_per_second": 1024,
        "error": null,
        "lifecycle": {{
            "type": "buildpack",
            "data": {{"buildpacks": ["ruby_buildpack"], "stack": "cflinuxfs4"}}
        }},
        "package": {{"guid": "8e4da443-f255-499c-8b47-b3729b5b7432"}},
        "droplet": null,
        "relationships": {{"app": {{"data": {{"guid": "7b34f1cf-7e73-428a-bb5a-8a17a8058396"}}}}}},
        "metadata": {{"labels": {{}}, "annotations": {{}}}},
        "links": {{
            "self": {{"href": "https://api.example.org/v3/builds/{guid}"}}
        }}
    }}"#
    )
}

pub(crate) fn deployment_json(guid: &str, value: &str) -> String {
    format!(
        r#"{{
        "guid": "{guid}",
        "created_at": "2018-04-25T22:42:10Z",
        "updated_at": "2018-04-25T22:42:10Z",
        "status": {{"value": "{value}", "reason": "DEPLOYING", "details": {{}}}},
        "strategy": "rolling",
        "droplet": {{"guid": "44ccfa61-dbcf-4a0d-82fe-f668e9d2a962"}},
        "previous_droplet": {{"guid": "cc6bc315-bd06-49ce-92c2-bc3ad45268c2"}},
        "new_processes": [{{"guid": "fd5d3e60-f88c-4c37-b1ae-667cfc65a856", "type": "web"}}],
        "revision": {{"guid": "56126cba-656a-4eba-a81e-7e9951b2df57", "version": 1}},
        "relationships": {{"app": {{"data": {{"guid": "305cea31-5a44-45ca-b51b-e89c7a8ef8b2"}}}}}},
        "metadata": {{"labels": {{}}, "annotations": {{}}}},
        "links": {{}}
    }}"#
    )
}

pub(crate) fn process_json(guid: &str, process_type: &str, instances: u32) -> String {
    format!(
        r#"{{
        "guid": "{guid}",
        "created_at": "2016-03-23T18:48:22Z",
        "updated_at": "2016-03-23T18:48:42Z",
        "type": "{process_type}",
        "command": "rackup",
        "instances": {instances},
        "memory_in_mb": 256,
        "disk_in_mb": 1024,
        "log_rate_limit_in_bytes_per_second": 1024,
        "health_check": {{"type": "port", "data": {{"timeout": null, "invocation_timeout": null}}}},
        "readiness_health_check": {{"type": "process", "data": {{"invocation_timeout": null, "interval": null}}}},
        "relationships": {{
            "app": {{"data": {{"guid": "ccc25a0f-c8f4-4b39-9f1b-de9f328d0ee5"}}}},
            "revision": {{"data": {{"guid": "885735b5-aea4-4cf5-8e44-961af0e41920"}}}}
        }},
        "metadata": {{"labels": {{}}, "annotations": {{}}}},
        "links": {{}}
    }}"#
    )
}
