//! Freestyle job XML rendering
//!
//! The create endpoint takes the job definition as a `config.xml` document.
//! Only the pieces a [`JobSpec`] can express are rendered: an optional node
//! restriction, an optional git/subversion checkout, and an optional shell
//! build step.

use jobctl_core::{JobSpec, ScmProvider};

/// Render the `config.xml` document for a freestyle job
pub fn freestyle_config_xml(spec: &JobSpec) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version='1.1' encoding='UTF-8'?>\n");
    xml.push_str("<project>\n");
    xml.push_str("  <actions/>\n");
    xml.push_str("  <description/>\n");
    xml.push_str("  <keepDependencies>false</keepDependencies>\n");
    xml.push_str("  <properties/>\n");
    push_scm(&mut xml, spec);
    push_node(&mut xml, spec);
    xml.push_str("  <disabled>false</disabled>\n");
    xml.push_str("  <blockBuildWhenDownstreamBuilding>false</blockBuildWhenDownstreamBuilding>\n");
    xml.push_str("  <blockBuildWhenUpstreamBuilding>false</blockBuildWhenUpstreamBuilding>\n");
    xml.push_str("  <triggers/>\n");
    xml.push_str("  <concurrentBuild>false</concurrentBuild>\n");
    push_builders(&mut xml, spec);
    xml.push_str("  <publishers/>\n");
    xml.push_str("  <buildWrappers/>\n");
    xml.push_str("</project>\n");
    xml
}

fn push_scm(xml: &mut String, spec: &JobSpec) {
    let Some(scm) = &spec.scm else {
        xml.push_str("  <scm class=\"hudson.scm.NullSCM\"/>\n");
        return;
    };

    match scm.provider {
        ScmProvider::Git => {
            xml.push_str("  <scm class=\"hudson.plugins.git.GitSCM\">\n");
            xml.push_str("    <configVersion>2</configVersion>\n");
            xml.push_str("    <userRemoteConfigs>\n");
            xml.push_str("      <hudson.plugins.git.UserRemoteConfig>\n");
            xml.push_str(&format!("        <url>{}</url>\n", escape(&scm.url)));
            xml.push_str("      </hudson.plugins.git.UserRemoteConfig>\n");
            xml.push_str("    </userRemoteConfigs>\n");
            xml.push_str("    <branches>\n");
            xml.push_str("      <hudson.plugins.git.BranchSpec>\n");
            let branch = scm.branch.as_deref().unwrap_or("master");
            xml.push_str(&format!("        <name>{}</name>\n", escape(branch)));
            xml.push_str("      </hudson.plugins.git.BranchSpec>\n");
            xml.push_str("    </branches>\n");
            xml.push_str(
                "    <doGenerateSubmoduleConfigurations>false</doGenerateSubmoduleConfigurations>\n",
            );
            xml.push_str("  </scm>\n");
        }
        ScmProvider::Subversion => {
            xml.push_str("  <scm class=\"hudson.scm.SubversionSCM\">\n");
            xml.push_str("    <locations>\n");
            xml.push_str("      <hudson.scm.SubversionSCM_-ModuleLocation>\n");
            xml.push_str(&format!("        <remote>{}</remote>\n", escape(&scm.url)));
            xml.push_str("        <local>.</local>\n");
            xml.push_str("      </hudson.scm.SubversionSCM_-ModuleLocation>\n");
            xml.push_str("    </locations>\n");
            xml.push_str("  </scm>\n");
        }
    }
}

fn push_node(xml: &mut String, spec: &JobSpec) {
    match &spec.node {
        Some(node) => {
            xml.push_str(&format!("  <assignedNode>{}</assignedNode>\n", escape(node)));
            xml.push_str("  <canRoam>false</canRoam>\n");
        }
        None => xml.push_str("  <canRoam>true</canRoam>\n"),
    }
}

fn push_builders(xml: &mut String, spec: &JobSpec) {
    let Some(command) = &spec.shell_command else {
        xml.push_str("  <builders/>\n");
        return;
    };

    xml.push_str("  <builders>\n");
    xml.push_str("    <hudson.tasks.Shell>\n");
    xml.push_str(&format!("      <command>{}</command>\n", escape(command)));
    xml.push_str("    </hudson.tasks.Shell>\n");
    xml.push_str("  </builders>\n");
}

/// Escape text for use in XML element content and attribute values
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobctl_core::ScmConfig;

    fn minimal() -> JobSpec {
        JobSpec {
            name: "demo".to_string(),
            node: None,
            scm: None,
            shell_command: None,
        }
    }

    #[test]
    fn minimal_job_roams_with_null_scm_and_no_builders() {
        let xml = freestyle_config_xml(&minimal());
        assert!(xml.contains("<scm class=\"hudson.scm.NullSCM\"/>"));
        assert!(xml.contains("<canRoam>true</canRoam>"));
        assert!(xml.contains("<builders/>"));
        assert!(!xml.contains("assignedNode"));
    }

    #[test]
    fn node_label_pins_the_job() {
        let mut spec = minimal();
        spec.node = Some("linux-agent".to_string());
        let xml = freestyle_config_xml(&spec);
        assert!(xml.contains("<assignedNode>linux-agent</assignedNode>"));
        assert!(xml.contains("<canRoam>false</canRoam>"));
    }

    #[test]
    fn git_scm_renders_url_and_branch() {
        let mut spec = minimal();
        spec.scm = Some(ScmConfig {
            provider: ScmProvider::Git,
            url: "https://example.com/repo.git".to_string(),
            branch: Some("develop".to_string()),
        });
        let xml = freestyle_config_xml(&spec);
        assert!(xml.contains("hudson.plugins.git.GitSCM"));
        assert!(xml.contains("<url>https://example.com/repo.git</url>"));
        assert!(xml.contains("<name>develop</name>"));
    }

    #[test]
    fn subversion_scm_renders_remote() {
        let mut spec = minimal();
        spec.scm = Some(ScmConfig {
            provider: ScmProvider::Subversion,
            url: "https://example.com/trunk".to_string(),
            branch: None,
        });
        let xml = freestyle_config_xml(&spec);
        assert!(xml.contains("hudson.scm.SubversionSCM"));
        assert!(xml.contains("<remote>https://example.com/trunk</remote>"));
    }

    #[test]
    fn shell_command_is_escaped() {
        let mut spec = minimal();
        spec.shell_command = Some("echo \"<done>\" && exit 0\n".to_string());
        let xml = freestyle_config_xml(&spec);
        assert!(xml.contains("echo &quot;&lt;done&gt;&quot; &amp;&amp; exit 0"));
    }
}
