// file: src/page/widget.rs
// description: static html blocks for the search box and client-side filter
// reference: Quarto raw html blocks

pub const RAW_HTML_OPEN: &str = "```{=html}";
pub const RAW_HTML_CLOSE: &str = "```";

pub const SEARCH_INPUT: &[&str] = &[
    "<div style='margin: 2rem 0;'>",
    "<input type='text' id='pubSearch' placeholder='Search publications...' ",
    "       style='width: 100%; padding: 0.75rem; font-size: 1rem; border: 2px solid #ddd; border-radius: 8px;' />",
    "</div>",
];

pub const CONTAINER_OPEN: &str = "<div id='publications-container'>";
pub const DIV_CLOSE: &str = "</div>";

/// Hides list items whose text does not contain the query, and whole
/// category sections when none of their items match a non-empty query.
pub const SEARCH_SCRIPT: &[&str] = &[
    "<script>",
    "document.addEventListener('DOMContentLoaded', function() {",
    "  const searchInput = document.getElementById('pubSearch');",
    "  const categories = document.querySelectorAll('.pub-category');",
    "",
    "  searchInput.addEventListener('input', function(e) {",
    "    const searchTerm = e.target.value.toLowerCase();",
    "",
    "    categories.forEach(category => {",
    "      const items = category.querySelectorAll('li');",
    "      let hasVisible = false;",
    "",
    "      items.forEach(item => {",
    "        const text = item.textContent.toLowerCase();",
    "        if (text.includes(searchTerm)) {",
    "          item.style.display = '';",
    "          hasVisible = true;",
    "        } else {",
    "          item.style.display = 'none';",
    "        }",
    "      });",
    "",
    "      // Hide category if no visible items",
    "      const categoryHeading = category.previousElementSibling;",
    "      if (categoryHeading && categoryHeading.tagName === 'H3') {",
    "        if (hasVisible || searchTerm === '') {",
    "          categoryHeading.style.display = '';",
    "          category.style.display = '';",
    "        } else {",
    "          categoryHeading.style.display = 'none';",
    "          category.style.display = 'none';",
    "        }",
    "      }",
    "    });",
    "  });",
    "});",
    "</script>",
];

/// Opening wrapper that scopes the search to one category.
pub fn category_open(tag: &str) -> String {
    format!("<div class='pub-category' data-category='{}'>", tag)
}
