// 页面渲染
//
// 将目录树与面包屑渲染为 HTML 页面；纯视图，不含业务逻辑

use crate::filesystem::{BreadcrumbSegment, ListingNode};

/// 页面样式与折叠脚本
const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Local File Server</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        h1 { color: #333; }
        .file { margin: 5px 0; padding: 8px; background-color: #f5f5f5; border-radius: 4px; }
        .file a { text-decoration: none; color: #0066cc; }
        .file a:hover { text-decoration: underline; }
        .folder { margin: 5px 0; padding: 8px; background-color: #e1f5fe; border-radius: 4px; cursor: pointer; }
        .folder-name { font-weight: bold; color: #0277bd; }
        .children { margin-left: 20px; border-left: 1px solid #ccc; padding-left: 10px; display: none; }
        .upload-form { margin: 20px 0; padding: 15px; background-color: #e9e9e9; border-radius: 5px; }
        .breadcrumb { margin-bottom: 15px; padding: 8px; background-color: #f0f0f0; border-radius: 4px; }
        .breadcrumb a { text-decoration: none; color: #0066cc; }
        .toggle-button { margin: 10px 0; padding: 8px 16px; background-color: #0277bd; color: white; border: none; border-radius: 4px; cursor: pointer; }
    </style>
    <script>
        function toggleFolder(id, event) {
            if (event) { event.stopPropagation(); }
            var children = document.getElementById('children-' + id);
            children.style.display = children.style.display === 'block' ? 'none' : 'block';
        }
        var allExpanded = false;
        function toggleAllFolders() {
            allExpanded = !allExpanded;
            var nodes = document.querySelectorAll('.children');
            for (var i = 0; i < nodes.length; i++) {
                nodes[i].style.display = allExpanded ? 'block' : 'none';
            }
            document.getElementById('toggle-all').textContent =
                allExpanded ? 'Collapse All Folders' : 'Expand All Folders';
        }
    </script>
</head>
<body>
    <h1>Local File Server</h1>
"#;

/// 渲染完整的目录列表页面
pub fn render_page(
    current_path: &str,
    breadcrumbs: &[BreadcrumbSegment],
    nodes: &[ListingNode],
) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(PAGE_HEAD);

    // 上传表单：隐藏的 path 字段必须排在 file 字段之前，
    // 上传处理器按字段到达顺序流式读取
    out.push_str("    <div class=\"upload-form\">\n        <h3>Upload File</h3>\n");
    out.push_str("        <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n");
    out.push_str(&format!(
        "            <input type=\"hidden\" name=\"path\" value=\"{}\">\n",
        escape_html(current_path)
    ));
    out.push_str("            <input type=\"file\" name=\"file\" required>\n");
    out.push_str("            <br><button type=\"submit\">Upload</button>\n");
    out.push_str("        </form>\n    </div>\n");

    if !current_path.is_empty() {
        out.push_str("    <div class=\"breadcrumb\">\n        <a href=\"/?path=\">Home</a>\n");
        for crumb in breadcrumbs {
            out.push_str(&format!(
                "        / <a href=\"/?path={}\">{}</a>\n",
                urlencoding::encode(&crumb.path),
                escape_html(&crumb.name)
            ));
        }
        out.push_str("    </div>\n");
    }

    out.push_str("    <h3>Files and Folders</h3>\n");
    out.push_str(
        "    <button id=\"toggle-all\" class=\"toggle-button\" onclick=\"toggleAllFolders()\">Expand All Folders</button>\n",
    );

    if nodes.is_empty() {
        out.push_str("    <p>No files found</p>\n");
    } else {
        let mut next_id = 0;
        render_nodes(&mut out, nodes, &mut next_id);
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// 递归渲染条目列表
///
/// 目录折叠使用本次渲染内分配的数字 id 配对 onclick 与 children 容器。
/// 条目路径绝不嵌入 JS 字符串：HTML 实体转义在属性值进入 JS 引擎前
/// 已被还原，路径中的引号会变成可执行代码
fn render_nodes(out: &mut String, nodes: &[ListingNode], next_id: &mut usize) {
    for node in nodes {
        if node.is_dir {
            let id = *next_id;
            *next_id += 1;
            out.push_str(&format!(
                "    <div class=\"folder\" onclick=\"toggleFolder({}, event)\">\
                 <a href=\"/?path={}\" class=\"folder-name\">{}</a></div>\n",
                id,
                urlencoding::encode(&node.path),
                escape_html(&node.name)
            ));
            out.push_str(&format!("    <div id=\"children-{}\" class=\"children\">\n", id));
            render_nodes(out, &node.children, next_id);
            out.push_str("    </div>\n");
        } else {
            out.push_str(&format!(
                "    <div class=\"file\"><a href=\"/download/{}\">{}</a> ({} bytes)</div>\n",
                encode_path(&node.path),
                escape_html(&node.name),
                node.size
            ));
        }
    }
}

/// 按段 URL 编码相对路径，保留 `/` 作为分隔符
fn encode_path(relative_path: &str) -> String {
    relative_path
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// HTML 转义
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
