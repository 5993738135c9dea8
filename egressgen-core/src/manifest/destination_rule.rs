use super::ResolvedSite;
use crate::error::Result;
use crate::tree::TemplateTree;
use serde_yaml::Value;

/// `egress-for-<easyname>`, pointed at the egress gateway with one subset
/// named after the site. The template must carry the subset slot.
pub fn build(mut tree: TemplateTree, site: &ResolvedSite) -> Result<Value> {
    tree.set(&["metadata"], "name", format!("egress-for-{}", site.easyname))?;
    tree.set(&["spec"], "host", site.gateway_host.as_str())?;
    tree.first_entry_mut(&["spec", "subsets"])?
        .insert("name".into(), site.easyname.as_str().into());
    Ok(tree.into_value())
}
